pub mod credentials;
pub mod hod;
pub mod indexing;
pub mod ocr;
pub mod pipeline;
pub mod poller;
pub mod validation;
