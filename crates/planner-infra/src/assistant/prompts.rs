//! Prompt text and response schemas for the assistant calls.

use serde_json::{Value, json};

use planner_core::domain::X_CHAR_LIMIT;

fn tone_sentence(tones: &[String]) -> String {
    if tones.is_empty() {
        "No specific tone was selected.".to_string()
    } else {
        format!("The desired tones are: {}.", tones.join(", "))
    }
}

fn tone_line(tones: &[String]) -> String {
    if tones.is_empty() {
        "No specific tone was selected.".to_string()
    } else {
        format!("Desired Tones: {}", tones.join(", "))
    }
}

/// `Post 1: "..."` lines, one per thread unit.
fn numbered_content(content: &[String]) -> String {
    content
        .iter()
        .enumerate()
        .map(|(i, text)| format!("Post {}: \"{}\"", i + 1, text))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn readiness(content: &[String], tones: &[String]) -> String {
    format!(
        "You are an expert X (formerly Twitter) content strategist. Your task is to analyze the \
following post or thread and provide concise, actionable feedback.
The user wants to check if their content is ready to post.
{tones}

Analyze the content based on clarity, engagement potential, character count, and alignment with \
the selected tones.
Provide your feedback in a brief, easy-to-read format. Use bullet points for suggestions.
- Start with a one-sentence overall assessment.
- Provide 2-3 specific, constructive suggestions for improvement.
- Mention if the content aligns well with the chosen tones, or how to improve it.
- Suggest relevant hashtags if appropriate.

Here is the content:
{content}",
        tones = tone_sentence(tones),
        content = numbered_content(content),
    )
}

pub fn hashtags(content: &[String]) -> String {
    format!(
        "You are an expert X (formerly Twitter) social media strategist.
Based on the following content, suggest 5-7 relevant hashtags.
Categorize them into 'Popular' (for broad reach) and 'Niche' (for a targeted audience).
For each category, provide a brief, one-sentence explanation of its strategic value.
Format the output clearly with headings for each category. Use markdown for formatting.

Here is the content:
{}",
        numbered_content(content)
    )
}

pub fn brainstorm(topic: Option<&str>) -> String {
    let subject = match topic {
        Some(topic) => format!("Based on the topic \"{topic}\", generate 3 distinct and engaging post ideas."),
        None => "Generate 3 engaging post ideas based on current trending topics in technology, \
science, and culture."
            .to_string(),
    };
    format!(
        "You are an expert X (formerly Twitter) content creator specializing in viral content. \
{subject} Each idea must be under {X_CHAR_LIMIT} characters, include 2-3 relevant hashtags, and \
be formatted to maximize engagement (e.g., using questions, bold statements, or lists).

Return your response as a JSON array of strings, where each string is a complete post idea."
    )
}

pub fn rephrase(text: &str, tones: &[String]) -> String {
    format!(
        "You are an expert X (formerly Twitter) copywriter. Your task is to rephrase the following \
text to maximize engagement, clarity, and impact, while adhering to the specified tones.
The rephrased text MUST be under {X_CHAR_LIMIT} characters.
Return ONLY the rephrased text, without any additional commentary, introductory phrases, or \
markdown formatting.

{tones}
Original Text: \"{text}\"",
        tones = tone_line(tones),
    )
}

pub fn format(text: &str, tones: &[String]) -> String {
    format!(
        "You are an expert X (formerly Twitter) social media editor. Your task is to add formatting \
to the following text to make it more readable and visually appealing.
- IMPORTANT: Do NOT change the wording or rephrase the original text. Your only job is to add \
formatting.
- Add strategic spacing and line breaks to improve the flow.
- Add a few relevant emojis to add personality and visual appeal.
- Structure parts of the text with bullet points or lists if it improves clarity, but without \
altering the original words.
- Ensure the final text stays under {X_CHAR_LIMIT} characters.
- The core message and wording of the text MUST remain exactly the same.
- Adhere to the specified tones when choosing emojis and formatting style.

Return ONLY the formatted text, without any additional commentary or markdown formatting.

{tones}
Original Text: \"{text}\"",
        tones = tone_line(tones),
    )
}

pub fn analyze(text: &str) -> String {
    format!(
        "You are a world-class social media analyst, specializing in X (formerly Twitter).
A user has provided the text of one of their past posts. Your task is to provide a comprehensive \
analysis to help them learn and improve.

Here is the post text:
\"{text}\"

Please structure your feedback in Markdown format with the following sections:

### Overall Assessment
A brief, one-paragraph summary of the post's effectiveness.

### Strengths
- What the post did well (e.g., clear call to action, good use of humor, relevant hashtag).
- Another positive aspect.

### Areas for Improvement
- A potential flaw (e.g., vague language, missed opportunity for engagement, confusing wording).
- Another area that could be stronger.

### Optimization for Reposting
Provide an optimized version of the post text. Explain the key changes you made in a short sentence.
**Optimized Version:**
> \"[Your rewritten post text here, under {X_CHAR_LIMIT} characters]\"

### Key Takeaways for the Future
- A concrete lesson the user can apply to their next post.
- Another actionable tip.

Provide only the analysis. Do not include any introductory or concluding remarks outside of this \
structure."
    )
}

pub fn score(content: &[String], tones: &[String]) -> String {
    format!(
        "You are a quantitative social media analyst. Your task is to score the following X \
(formerly Twitter) post on a scale of 1-10 across several key metrics.
Provide a concise, one-sentence rationale for each score.
{tones}

Content to analyze:
{content}

Return your analysis in a JSON object with the specified schema.",
        tones = tone_sentence(tones),
        content = numbered_content(content),
    )
}

/// Response schema: array of idea strings.
pub fn brainstorm_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": { "type": "STRING", "description": "An engaging post idea for X." }
    })
}

/// Response schema: the four score metrics.
pub fn score_schema() -> Value {
    let metric = |what: &str| {
        json!({
            "type": "OBJECT",
            "properties": {
                "score": { "type": "INTEGER", "description": format!("Score from 1-10 for {what}.") },
                "rationale": { "type": "STRING", "description": format!("Rationale for the {what} score.") }
            },
            "required": ["score", "rationale"]
        })
    };
    json!({
        "type": "OBJECT",
        "properties": {
            "engagement": metric("engagement potential"),
            "clarity": metric("clarity and readability"),
            "toneAlignment": metric("tone alignment"),
            "overall": metric("overall quality")
        },
        "required": ["engagement", "clarity", "toneAlignment", "overall"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_content_is_numbered() {
        let prompt = readiness(&strings(&["hook", "payoff"]), &[]);
        assert!(prompt.contains("Post 1: \"hook\"\nPost 2: \"payoff\""));
        assert!(prompt.contains("No specific tone was selected."));
    }

    #[test]
    fn test_tones_listed() {
        let tones = strings(&["Educator", "Humorous"]);
        assert!(score(&strings(&["x"]), &tones).contains("The desired tones are: Educator, Humorous."));
        assert!(rephrase("x", &tones).contains("Desired Tones: Educator, Humorous"));
    }

    #[test]
    fn test_brainstorm_topic() {
        assert!(brainstorm(Some("rust")).contains("Based on the topic \"rust\""));
        assert!(brainstorm(None).contains("current trending topics"));
        assert!(brainstorm(None).contains("JSON array of strings"));
    }

    #[test]
    fn test_score_schema_requires_all_metrics() {
        let schema = score_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 4);
        assert_eq!(schema["properties"]["toneAlignment"]["type"], "OBJECT");
    }
}
