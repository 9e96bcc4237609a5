//! Pure prompt/message builders. No I/O, deterministic for a given input;
//! this is the regression seam for prompt formatting.

use serde_json::{json, Value};

const KEYWORD_INSTRUCTION: &str = "Return EXACTLY 3 evocative, texture-rich words capturing the collective mood (e.g., \"Fractured, Solitude, Decay\").\nAvoid generic terms.\nOutput ONLY the 3 words, comma-separated.";

const VISION_SYSTEM_PROMPT: &str = r#"You are an expert in visual analysis and Roland Barthes' concept of "punctum".
Your goal is to analyze the image and identify:
1. visual_summary: A single concise sentence (one line) explaining exactly what you see in the image (the subjects, colors, setting).
2. ai_feeling: A poetic sentence describing the specific emotion or mood that YOU, as an AI, perceive or "feel" when looking at this image.
3. studium_description: The general cultural, linguistic, and political interpretation.
4. punctum_element: The detail that pricks, bruises, or pierces the viewer.
5. emotional_atmosphere: A poetic but precise description of the mood.

Output strictly valid JSON with this structure:
{
    "visual_summary": "...",
    "ai_feeling": "...",
    "studium_description": "...",
    "punctum_element": "...",
    "emotional_keywords": ["keyword1", "keyword2", "keyword3", "keyword4", "keyword5"],
    "emotional_atmosphere": "...",
    "dominant_emotion": "..."
}"#;

const CONSENSUS_SYSTEM_PROMPT: &str = r#"You are a data scientist analyzing the "Invisible Punctum" - the gap between machine vision and human emotion.
You will be given:
1. An AI's visual and emotional analysis of an image.
2. A list of actual human responses/feelings about the same image.

Your task is to:
1. Calculate a "Consensus Score" (0-100): How much do the humans agree with *each other*? (High = everyone feels the same, Low = chaos).
2. Calculate a "Trainability Score" (0-100): How well does the AI's analysis align with the *human consensus*? (High = AI understands the human feeling, Low = AI is completely missing the subtle emotional context).
3. Write a "Gap Analysis": A concise, sophisticated paragraph explaining *why* the AI succeeded or failed to capture the human feeling.

Output strictly valid JSON:
{
    "consensus_score": 0,
    "trainability_score": 0,
    "gap_analysis": "...",
    "human_consensus_keywords": ["keyword1", "keyword2"]
}"#;

/// Numbered, quoted comment list plus the extraction instruction.
pub fn keyword_prompt(comments: &[String]) -> String {
    let listed = comments
        .iter()
        .filter(|comment| !comment.trim().is_empty())
        .enumerate()
        .map(|(i, comment)| format!("{}. \"{}\"", i + 1, comment))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Analyze these human responses:\n{listed}\n\n{KEYWORD_INSTRUCTION}")
}

pub fn keyword_messages(prompt: &str) -> Value {
    json!([{ "role": "user", "content": prompt }])
}

pub fn vision_messages(image_url: &str, user_context: Option<&str>) -> Value {
    let user_prompt = match user_context.map(str::trim).filter(|ctx| !ctx.is_empty()) {
        Some(ctx) => format!(
            "Analyze this image. The user also noted: \"{ctx}\". Consider this but form your own independent visual analysis."
        ),
        None => "Analyze this image. Focus on the emotional and psychological impact.".to_string(),
    };
    json!([
        { "role": "system", "content": VISION_SYSTEM_PROMPT },
        {
            "role": "user",
            "content": [
                { "type": "text", "text": user_prompt },
                { "type": "image_url", "image_url": { "url": image_url } }
            ]
        }
    ])
}

pub fn consensus_messages(ai_analysis: &Value, human_comments: &[String]) -> Value {
    let comments_text = human_comments
        .iter()
        .map(|comment| format!("\"{comment}\""))
        .collect::<Vec<_>>()
        .join("\n- ");
    let ai_pretty =
        serde_json::to_string_pretty(ai_analysis).unwrap_or_else(|_| ai_analysis.to_string());
    let user_prompt = format!("AI ANALYSIS:\n{ai_pretty}\n\nHUMAN RESPONSES:\n- {comments_text}");
    json!([
        { "role": "system", "content": CONSENSUS_SYSTEM_PROMPT },
        { "role": "user", "content": user_prompt }
    ])
}
