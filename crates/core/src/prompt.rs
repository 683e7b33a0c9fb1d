//! Prompt Construction
//!
//! Builds the instruction text for each capability. Every builder is a pure
//! function of its inputs. Constraints that affect parseability (JSON-only
//! output, score ranges, a single bolded title) are stated here and checked
//! again by [`crate::validate`], because the model does not guarantee them.

/// Persona instruction placed in front of a passage for speech synthesis.
pub const SPEECH_PERSONA: &str =
    "Đọc bài đọc sau đây với giọng một cô giáo người Việt Nam dịu dàng, truyền cảm:";

const EVALUATION_PREAMBLE: &str = r#"Bạn là một cô giáo dạy tiếng Việt lớp 2, rất thân thiện, dịu dàng và luôn động viên học sinh. Nhiệm vụ của bạn là lắng nghe và nhận xét bài đọc của một bạn nhỏ.

Hãy đưa ra nhận xét ở định dạng JSON. Đừng viết gì khác ngoài đối tượng JSON nhé.

Đối tượng JSON phải có cấu trúc như sau:
{
  "overallFeedback": "Hãy viết một lời nhận xét ngắn (2-3 câu), thật tích cực và đáng yêu để động viên con. Con có thể dùng những hình ảnh so sánh vui vẻ, ví dụ 'giọng đọc của con trong như tiếng chuông' hoặc 'con đọc nhanh như một cơn gió'. Nếu có lỗi sai, hãy nhắc nhở thật nhẹ nhàng thôi nhé, ví dụ 'Lần sau con chỉ cần chú ý hơn một chút ở từ... là bài đọc sẽ còn hay hơn nữa đó'.",
  "scores": {
      "fluency": cho điểm độ trôi chảy (số nguyên 0-10),
      "pronunciation": cho điểm phát âm tròn vành rõ chữ, đúng dấu thanh (số nguyên 0-10),
      "accuracy": cho điểm đọc đúng chữ, không thêm/bớt từ (số nguyên 0-10),
      "overall": cho điểm chung cho cả bài đọc của con (số nguyên 0-10)
  },
  "errors": [
    {
      "type": "mispronounced" | "skipped" | "added",
      "originalWord": "Từ đúng trong bài (nếu con đọc thêm từ thì để là null).",
      "studentWord": "Từ con đã đọc (nếu con bỏ qua từ thì để là null).",
      "contextSentence": "Câu văn trong bài có chứa từ bị lỗi."
    }
  ]
}

Một điều quan trọng nữa cô cần lưu ý: học sinh có thể có giọng đọc theo vùng miền (ví dụ: giọng miền Trung). Cô hãy châm chước và đừng bắt lỗi những khác biệt nhỏ về phát âm do âm hưởng địa phương, miễn là con đọc rõ chữ và không sai sang một từ có nghĩa khác. Hãy tập trung vào việc con có đọc đúng từ, đúng dấu thanh và trôi chảy hay không nhé.

QUAN TRỌNG NHẤT: Tuyệt đối không được liệt kê một từ vào danh sách lỗi nếu học sinh đã đọc đúng từ đó. Ví dụ, nếu từ gốc là "bi" và học sinh cũng đọc là "bi", đừng bao giờ báo đây là lỗi."#;

const EVALUATION_CLOSING: &str = "Bây giờ, cô hãy phân tích và cho con kết quả JSON nhé. Cô nhớ chú ý các lỗi về dấu thanh trong tiếng Việt, ví dụ 'ma' khác với 'má', 'mạ', 'mã', 'mả'.";

/// Prompt for the speech capability.
pub fn speech_prompt(passage: &str) -> String {
    format!("{} {}", SPEECH_PERSONA, passage)
}

/// Prompt for the evaluation capability.
///
/// Both texts are embedded verbatim between identical sentinel lines. The
/// sentinel is a run of dashes long enough that no line of either text can
/// be mistaken for it.
pub fn evaluation_prompt(original_text: &str, student_transcript: &str) -> String {
    let fence = sentinel_for(&[original_text, student_transcript]);
    format!(
        "{preamble}\n\n\
         Đây là văn bản gốc trong sách (nằm giữa hai dòng {fence}):\n\
         {fence}\n{original}\n{fence}\n\n\
         Đây là phần ghi âm giọng đọc của con (nằm giữa hai dòng {fence}):\n\
         {fence}\n{transcript}\n{fence}\n\n\
         {closing}",
        preamble = EVALUATION_PREAMBLE,
        fence = fence,
        original = original_text,
        transcript = student_transcript,
        closing = EVALUATION_CLOSING,
    )
}

/// Prompt for the lesson suggestion capability.
pub fn suggestion_prompt(learner_name: &str, candidate_titles: &[String]) -> String {
    format!(
        "Bạn là một cô giáo dạy tiếng Việt lớp 2, thân thiện. Học sinh tên là {name} cần gợi ý đọc bài. \
         Hãy chọn MỘT bài từ danh sách sau và viết một câu gợi ý thật đáng yêu, bao gồm tên bài đọc được in đậm bằng markdown (ví dụ: **Tên bài**). \
         Chỉ in đậm đúng một tên bài, giữ nguyên tên bài như trong danh sách. \
         Ví dụ: \"Chào {name}! Hôm nay mình đọc bài **Tên bài** nhé, nghe vui lắm đó! 😺\". \
         Chỉ trả về câu gợi ý đó thôi. Danh sách: {titles}",
        name = learner_name,
        titles = candidate_titles.join(", "),
    )
}

/// Shortest dash run (at least three) that appears in none of `texts`.
fn sentinel_for(texts: &[&str]) -> String {
    let longest_run = texts
        .iter()
        .flat_map(|text| text.split(|c: char| c != '-'))
        .map(str::len)
        .max()
        .unwrap_or(0);
    "-".repeat(longest_run.max(2) + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_prompt_wraps_passage() {
        let prompt = speech_prompt("Mẹ đi chợ.");
        assert!(prompt.starts_with(SPEECH_PERSONA));
        assert!(prompt.ends_with("Mẹ đi chợ."));
    }

    #[test]
    fn test_evaluation_prompt_embeds_both_texts() {
        let prompt = evaluation_prompt("Bé chơi bi.", "Bé chơi bi bi.");
        assert!(prompt.contains("---\nBé chơi bi.\n---"));
        assert!(prompt.contains("---\nBé chơi bi bi.\n---"));
        assert!(prompt.contains("QUAN TRỌNG NHẤT"));
        assert!(prompt.contains("\"overallFeedback\""));
        assert!(prompt.contains("0-10"));
    }

    #[test]
    fn test_evaluation_prompt_is_pure() {
        assert_eq!(
            evaluation_prompt("a", "b"),
            evaluation_prompt("a", "b")
        );
    }

    #[test]
    fn test_sentinel_outgrows_dashes_in_passage() {
        let passage = "Chương một\n---\nHết ----- chương";
        let prompt = evaluation_prompt(passage, "học sinh đọc");
        assert!(prompt.contains("------\nChương một"));
        assert_eq!(sentinel_for(&["không có gạch"]), "---");
        assert_eq!(sentinel_for(&["a - b", "c -- d"]), "---");
        assert_eq!(sentinel_for(&["a ---- b"]), "-----");
    }

    #[test]
    fn test_suggestion_prompt_lists_every_candidate() {
        let titles = vec!["Bài A".to_string(), "Bài B".to_string()];
        let prompt = suggestion_prompt("Lan", &titles);
        assert!(prompt.contains("Học sinh tên là Lan"));
        assert!(prompt.contains("Chào Lan!"));
        assert!(prompt.ends_with("Danh sách: Bài A, Bài B"));
        assert!(prompt.contains("**Tên bài**"));
    }
}
