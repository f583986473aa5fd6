pub mod huggingface;
pub mod ollama;

pub use huggingface::HuggingFaceProvider;
pub use ollama::OllamaProvider;
