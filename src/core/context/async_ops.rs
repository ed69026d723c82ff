/*!
Asynchronous wrappers around a cipher context.

Encryption is CPU-bound, so every operation runs on Tokio's blocking
pool and the caller awaits the result. The context is shared through an
`Arc`; it holds no per-call state, so any number of these tasks may run
against one context at once.
*/

use std::path::PathBuf;
use std::sync::Arc;

use tokio::task;

use crate::core::context::CipherContext;
use crate::core::crypto::traits::BlockCipher;
use crate::core::error::{Error, Result};

async fn run_blocking<T, F>(what: &'static str, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Internal(format!("{} task failed: {}", what, e)))?
}

/// Encrypt `plaintext` on the blocking pool
pub async fn encrypt_async<C>(context: Arc<CipherContext<C>>, plaintext: Vec<u8>) -> Result<Vec<u8>>
where
    C: BlockCipher + 'static,
{
    run_blocking("encryption", move || context.encrypt(&plaintext)).await
}

/// Decrypt `ciphertext` on the blocking pool
pub async fn decrypt_async<C>(context: Arc<CipherContext<C>>, ciphertext: Vec<u8>) -> Result<Vec<u8>>
where
    C: BlockCipher + 'static,
{
    run_blocking("decryption", move || context.decrypt(&ciphertext)).await
}

/// Encrypt a file on the blocking pool
pub async fn encrypt_file_async<C>(context: Arc<CipherContext<C>>, input: PathBuf, output: PathBuf) -> Result<()>
where
    C: BlockCipher + 'static,
{
    run_blocking("file encryption", move || context.encrypt_file(&input, &output)).await
}

/// Decrypt a file on the blocking pool
pub async fn decrypt_file_async<C>(context: Arc<CipherContext<C>>, input: PathBuf, output: PathBuf) -> Result<()>
where
    C: BlockCipher + 'static,
{
    run_blocking("file decryption", move || context.decrypt_file(&input, &output)).await
}
