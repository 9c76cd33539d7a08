// Adapters layer: concrete implementations of the domain ports (http transport, local storage, pdf).

pub mod http;
pub mod pdf;
pub mod storage;
