mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use reading_coach_core::{AudioPayload, CoachConfig, Credential, ReadingCoach};
use std::path::Path;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

use cli::{Cli, Commands, text_or_file};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_timer(ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let credential = cli.api_key.as_deref().and_then(Credential::new);
    let coach = ReadingCoach::with_gemini(CoachConfig::from_env());

    match cli.command {
        Commands::Speak(cmd) => {
            let text = text_or_file(&cmd.text).context("Failed to read passage text")?;
            let Some(audio) = coach.synthesize_speech(&text, credential.as_ref()).await else {
                bail!("Speech synthesis produced no audio");
            };
            write_wav(&audio, &cmd.out)?;
            info!(path = %cmd.out.display(), "Wrote speech audio");
            println!("{}", cmd.out.display());
        }
        Commands::Evaluate(cmd) => {
            let original = text_or_file(&cmd.original).context("Failed to read original text")?;
            let transcript =
                text_or_file(&cmd.transcript).context("Failed to read transcript")?;
            let result = coach
                .evaluate_reading(&original, &transcript, credential.as_ref())
                .await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Suggest(cmd) => {
            let suggestion = coach
                .suggest_lesson(&cmd.name, &cmd.lessons, credential.as_ref())
                .await;
            println!("{suggestion}");
        }
    }

    Ok(())
}

fn write_wav(audio: &AudioPayload, path: &Path) -> Result<()> {
    std::fs::write(path, audio.to_wav())
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("speech.wav");
        let audio = AudioPayload::from_base64("AQIDBA==").unwrap();

        write_wav(&audio, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 48);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[44..], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_write_wav_uses_declared_sample_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("speech.wav");
        let audio = AudioPayload::from_base64("AQIDBA==")
            .unwrap()
            .with_mime_type(Some("audio/L16;codec=pcm;rate=16000"));

        write_wav(&audio, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(u32::from_le_bytes(bytes[24..28].try_into().unwrap()), 16_000);
    }

    #[test]
    fn test_write_wav_to_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("speech.wav");
        let audio = AudioPayload::from_base64("AQIDBA==").unwrap();

        assert!(write_wav(&audio, &path).is_err());
    }
}
