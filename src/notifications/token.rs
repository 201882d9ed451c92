use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;

/// Random bytes drawn per token, before encoding
pub const TOKEN_BYTES: usize = 32;

/// Source of confirmation secrets
pub trait TokenGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// URL-safe base64 of [`TOKEN_BYTES`] bytes from the thread-local CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTokenGenerator;

impl TokenGenerator for RandomTokenGenerator {
    fn generate(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}

/// Always returns the same token. Useful when the link must be predictable.
#[derive(Debug, Clone)]
pub struct FixedTokenGenerator(pub String);

impl TokenGenerator for FixedTokenGenerator {
    fn generate(&self) -> String {
        self.0.clone()
    }
}
