//! Command line interface for the reading coach.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Vietnamese reading coach
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Personal model API key, overriding GEMINI_API_KEY for this call
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read a passage aloud and save it as a WAV file
    Speak(SpeakCommand),

    /// Evaluate a transcript of a child's reading
    Evaluate(EvaluateCommand),

    /// Suggest the next lesson for a learner
    Suggest(SuggestCommand),
}

#[derive(Parser, Debug)]
pub struct SpeakCommand {
    /// Passage text, or a path to a file holding it
    #[arg(short, long)]
    pub text: String,

    /// Where to write the WAV file
    #[arg(short, long, default_value = "speech.wav")]
    pub out: PathBuf,
}

#[derive(Parser, Debug)]
pub struct EvaluateCommand {
    /// Original passage, or a path to a file holding it
    #[arg(short, long)]
    pub original: String,

    /// What the child actually read, or a path to a file holding it
    #[arg(short, long)]
    pub transcript: String,
}

#[derive(Parser, Debug)]
pub struct SuggestCommand {
    /// Learner's name
    #[arg(short, long)]
    pub name: String,

    /// Candidate lesson title, repeatable
    #[arg(short, long = "lesson", required = true)]
    pub lessons: Vec<String>,
}

/// Reads `arg` as a file when it names one, otherwise uses it as literal text.
pub fn text_or_file(arg: &str) -> std::io::Result<String> {
    let path = Path::new(arg);
    if path.is_file() {
        std::fs::read_to_string(path)
    } else {
        Ok(arg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_speak() {
        let cli = Cli::parse_from(["reading-coach", "speak", "--text", "Mẹ đi chợ.", "--out", "a.wav"]);
        match cli.command {
            Commands::Speak(cmd) => {
                assert_eq!(cmd.text, "Mẹ đi chợ.");
                assert_eq!(cmd.out, PathBuf::from("a.wav"));
            }
            other => panic!("Unexpected command: {:?}", other),
        }
        assert!(cli.api_key.is_none());
    }

    #[test]
    fn test_parse_suggest_with_global_key() {
        let cli = Cli::parse_from([
            "reading-coach",
            "suggest",
            "--name",
            "Lan",
            "--lesson",
            "Bài A",
            "--lesson",
            "Bài B",
            "--api-key",
            "user-key",
        ]);
        assert_eq!(cli.api_key.as_deref(), Some("user-key"));
        match cli.command {
            Commands::Suggest(cmd) => {
                assert_eq!(cmd.name, "Lan");
                assert_eq!(cmd.lessons, vec!["Bài A", "Bài B"]);
            }
            other => panic!("Unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_suggest_requires_a_lesson() {
        let result = Cli::try_parse_from(["reading-coach", "suggest", "--name", "Lan"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_text_or_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Bé chơi bi.").unwrap();

        let from_file = text_or_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(from_file, "Bé chơi bi.");

        let literal = text_or_file("Bé chơi bi.").unwrap();
        assert_eq!(literal, "Bé chơi bi.");
    }
}
