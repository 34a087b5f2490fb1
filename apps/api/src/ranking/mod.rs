// Resume ranking: retrieval, relevance scoring and LLM explanations.
// All LLM calls go through llm_client; nothing here talks to the backend directly.

pub mod driver;
pub mod explain;
pub mod handlers;
pub mod retriever;
pub mod scoring;
