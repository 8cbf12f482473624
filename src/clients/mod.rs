pub mod ocr_client;
pub mod recognizer;

pub use ocr_client::OcrClient;
pub use recognizer::{encode_data_uri, RecognizeInput, Recognizer};
