//! The decrypt-attempt primitive searches call once per candidate.

use std::fs;
use std::io;
use std::path::Path;

use log::warn;
use lopdf::Document;
use lopdf::Error as LopdfError;
use lopdf::encryption::DecryptionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("the supplied password is incorrect")]
    IncorrectPassword,

    #[error("PDF error: {0}")]
    Pdf(LopdfError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<LopdfError> for ProbeError {
    fn from(err: LopdfError) -> Self {
        match err {
            LopdfError::Decryption(DecryptionError::IncorrectPassword) => {
                ProbeError::IncorrectPassword
            }
            other => ProbeError::Pdf(other),
        }
    }
}

/// Opaque decryption oracle for one encrypted document.
///
/// `check` is called once per candidate from any number of threads and is
/// where search time goes. `unlock` runs once, with the password a search
/// found, to produce the decrypted document.
pub trait Probe: Sync {
    /// Whether `candidate` opens the document. Every failure counts as a
    /// wrong password.
    fn check(&self, candidate: &str) -> bool;

    /// Decrypts the document with `password` and returns its bytes.
    fn unlock(&self, password: &str) -> Result<Vec<u8>, ProbeError>;
}

/// Probe backed by `lopdf`, parsed once and shared read-only by every worker.
///
/// Loading without the password keeps only the encryption dictionary, which
/// is all `check` needs. The source bytes are kept so `unlock` can reload the
/// whole document with the password.
#[derive(Debug, Clone)]
pub struct PdfProbe {
    document: Document,
    source: Vec<u8>,
}

impl PdfProbe {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProbeError> {
        let document = Document::load_mem(bytes)?;
        Ok(PdfProbe {
            document,
            source: bytes.to_vec(),
        })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ProbeError> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn is_encrypted(&self) -> bool {
        self.document.is_encrypted()
    }
}

impl Probe for PdfProbe {
    fn check(&self, candidate: &str) -> bool {
        match self.document.authenticate_password(candidate) {
            Ok(()) => true,
            Err(LopdfError::Decryption(DecryptionError::IncorrectPassword)) => false,
            Err(e) => {
                warn!("rejecting {candidate:?} on unexpected PDF error: {e}");
                false
            }
        }
    }

    fn unlock(&self, password: &str) -> Result<Vec<u8>, ProbeError> {
        self.document.authenticate_password(password)?;

        let mut document = Document::load_mem_with_password(&self.source, password)?;
        // Saved output must not claim an encryption it no longer has.
        if let Some(encrypt) = document.trailer.remove(b"Encrypt") {
            if let Ok(id) = encrypt.as_reference() {
                document.objects.remove(&id);
            }
        }
        document.encryption_state = None;

        let mut bytes = Vec::new();
        document.save_to(&mut bytes)?;
        Ok(bytes)
    }
}
