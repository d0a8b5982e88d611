pub const DEFAULT_TOKEN_LIMIT: usize = 4096;

/// Context-token budget of a model deployment. Unknown names get the default.
pub fn model_tokens_limit(model: &str) -> usize {
    match model {
        "gpt-35-turbo" => 4096,
        "gpt-4" => 8192,
        "gpt-35-turbo-16k" => 16384,
        "gpt-4-32k" => 32768,
        _ => DEFAULT_TOKEN_LIMIT,
    }
}
