//! Prompt templates for chat and file analysis.
//!
//! Everything here is a pure string transformation so it can be tested
//! without a model.

use crate::dtos::{HistoryEntry, Role};
use unicode_properties::{GeneralCategory, UnicodeGeneralCategory};

/// Number of trailing history entries considered for chat context.
pub const HISTORY_WINDOW: usize = 6;

/// Substituted when no history line was rendered.
pub const NO_CONTEXT_PLACEHOLDER: &str = "No previous context";

/// Persona, capabilities and guidelines that open every chat prompt.
pub const CHAT_SYSTEM_PROMPT: &str = r#"You are an AI Business Analyzer assistant specializing in helping entrepreneurs and business professionals. Your capabilities include:

1. **Business Idea Generation**: Create unique, innovative business concepts with detailed analysis
2. **Market Analysis**: Provide comprehensive market research, competitor insights, and industry trends
3. **Financial Projections**: Develop realistic financial models, revenue forecasts, and cost structures
4. **Marketing Strategies**: Design effective marketing plans, customer acquisition strategies, and growth tactics
5. **Business Data Analysis**: Interpret business metrics, identify trends, and provide actionable recommendations

Guidelines:
- Be specific and actionable in your advice
- Provide concrete examples and real-world insights
- Consider current market trends and economic conditions
- Tailor responses to the user's context
- Vary your responses - avoid repetitive patterns
- Use data and statistics when relevant
- Be creative and think outside the box"#;

/// The six analysis sections requested for every uploaded file.
pub const ANALYSIS_INSTRUCTIONS: &str = r#"Please provide a detailed analysis including:

1. **Key Metrics Summary**
   - Identify the main performance indicators
   - Highlight significant numbers and trends

2. **Trend Analysis**
   - Revenue patterns and growth trends
   - Expense analysis and cost structure
   - Profit margins and profitability

3. **Performance Insights**
   - Strong performing areas
   - Areas needing improvement
   - Seasonal patterns or anomalies

4. **Actionable Recommendations**
   - Specific steps to improve performance
   - Cost optimization opportunities
   - Revenue growth strategies

5. **Risk Assessment**
   - Potential concerns or red flags
   - Areas requiring attention

6. **Next Steps**
   - Immediate actions to take
   - Long-term strategic recommendations

Be specific with numbers from the data and provide concrete, actionable advice."#;

/// Render the last [`HISTORY_WINDOW`] entries as `User: …` / `Assistant: …`
/// lines.
///
/// A history of one entry or fewer renders nothing. Entries with an
/// unrecognised role still take up a slot in the window but produce no line.
pub fn render_history(history: &[HistoryEntry]) -> String {
    if history.len() <= 1 {
        return String::new();
    }

    let start = history.len().saturating_sub(HISTORY_WINDOW);
    let mut context = String::new();

    for entry in &history[start..] {
        let prefix = match entry.role {
            Role::User => "User",
            Role::Assistant => "Assistant",
            Role::Other => continue,
        };
        context.push_str(&format!("{}: {}\n", prefix, entry.content));
    }

    context
}

/// Rendered history, or [`NO_CONTEXT_PLACEHOLDER`] when nothing rendered.
pub fn conversation_context(history: &[HistoryEntry]) -> String {
    let context = render_history(history);
    if context.is_empty() {
        NO_CONTEXT_PLACEHOLDER.to_string()
    } else {
        context
    }
}

pub fn build_chat_prompt(message: &str, history: &[HistoryEntry]) -> String {
    format!(
        "{}\n\nCurrent conversation context:\n{}\n\nUser's new question: {}\n\nProvide a detailed, helpful response:",
        CHAT_SYSTEM_PROMPT,
        conversation_context(history),
        message
    )
}

pub fn build_analysis_prompt(filename: &str, content: &str) -> String {
    format!(
        "Analyze this business data file and provide comprehensive insights:\n\nFilename: {}\nFile Content:\n{}\n\n{}",
        filename, content, ANALYSIS_INSTRUCTIONS
    )
}

/// Decode uploaded bytes as UTF-8, dropping any invalid sequences.
pub fn decode_file_content(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Whether the content has anything worth charting: at least one digit.
///
/// A digit is any Unicode decimal digit (`Nd`, so Arabic-Indic or Devanagari
/// digits count) or one of the digit forms in [`DIGIT_FORMS`]. Fractions and
/// Roman numerals do not count.
pub fn has_numeric_data(content: &str) -> bool {
    content.chars().any(is_digit)
}

/// Characters with `Numeric_Type=Digit` outside `Nd`: superscripts,
/// subscripts, circled and parenthesized digits and a few historic scripts.
const DIGIT_FORMS: &[(char, char)] = &[
    ('\u{00B2}', '\u{00B3}'),
    ('\u{00B9}', '\u{00B9}'),
    ('\u{1369}', '\u{1371}'),
    ('\u{19DA}', '\u{19DA}'),
    ('\u{2070}', '\u{2070}'),
    ('\u{2074}', '\u{2079}'),
    ('\u{2080}', '\u{2089}'),
    ('\u{2460}', '\u{2468}'),
    ('\u{2474}', '\u{247C}'),
    ('\u{2488}', '\u{2490}'),
    ('\u{24EA}', '\u{24EA}'),
    ('\u{24F5}', '\u{24FD}'),
    ('\u{24FF}', '\u{24FF}'),
    ('\u{2776}', '\u{277E}'),
    ('\u{2780}', '\u{2788}'),
    ('\u{278A}', '\u{2792}'),
    ('\u{10A40}', '\u{10A43}'),
    ('\u{10E60}', '\u{10E68}'),
    ('\u{11052}', '\u{1105A}'),
    ('\u{1F100}', '\u{1F10A}'),
];

fn is_digit(c: char) -> bool {
    c.general_category() == GeneralCategory::DecimalNumber
        || DIGIT_FORMS
            .iter()
            .any(|&(start, end)| (start..=end).contains(&c))
}
