// Question classification and prompt construction
// Author: kelexine (https://github.com/kelexine)

/// Fixed reply to greetings and identity questions.
pub const IDENTITY_REPLY: &str =
    "painvestex is an assistant here to help with any questions you have.";

const GREETING_MARKERS: [&str; 2] = ["greeting", "who are you"];

/// Whether the question should get [`IDENTITY_REPLY`] instead of a generated
/// answer. Matches case-insensitively anywhere in the text.
pub fn is_greeting(question: &str) -> bool {
    let lowered = question.to_lowercase();
    GREETING_MARKERS.iter().any(|marker| lowered.contains(marker))
}

/// Instructional prompt sent to the model. The question is embedded as
/// given, not normalized.
pub fn build_prompt(question: &str) -> String {
    format!(
        "You are painvestex, a highly knowledgeable assistant capable of answering questions across a wide range of topics.\n\
         Your goal is to provide clear, concise, and accurate responses to the user's query.\n\
         If the user asks a question that is out of the ordinary or needs a brief conclusion, summarize the main points and give a brief, insightful explanation.\n\
         The question: {}\n",
        question
    )
}
