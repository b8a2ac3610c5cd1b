/*
[INPUT]:  API schema and feed payload shapes
[OUTPUT]: Typed requests, responses, filters, and article accessors
[POS]:    Data layer - module wiring
[UPDATE]: When adding new types
*/

pub mod filter;
pub mod news_item;
pub mod requests;
pub mod responses;

pub use filter::SubscribeFilter;
pub use news_item::{EnvelopePolicy, NewsItem};
pub use requests::NewsSearchRequest;
pub use responses::{EngineCategory, EngineTreeResponse, EngineType, NewsSearchResponse};
