/*!
Streaming encryption and decryption.

This module provides incremental encryptors and decryptors that accept
input in arbitrary pieces, plus `Read`/`Write` and file drivers built on
them. Chaining state carries across buffers, so streaming output is
byte-identical to the whole-buffer path for every deterministic mode.
*/

use std::fs::File;
use std::io::{BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use bytes::BytesMut;

use crate::core::context::modes::ChainState;
use crate::core::context::padding::{add_padding, remove_padding};
use crate::core::context::CipherContext;
use crate::core::crypto::traits::BlockCipher;
use crate::core::error::Result;
use crate::data_err;

/// Incremental encryptor over one message
pub struct StreamEncryptor<'a, C: BlockCipher> {
    /// Context providing the cipher, mode and padding
    context: &'a CipherContext<C>,

    /// Chaining state carried between buffers
    chain: ChainState,

    /// Bytes waiting for a full block
    pending: BytesMut,

    /// Header not yet handed to the caller
    header: Option<Vec<u8>>,
}

impl<'a, C: BlockCipher> StreamEncryptor<'a, C> {
    /// Start encrypting a new message
    pub fn new(context: &'a CipherContext<C>) -> Result<Self> {
        let mut chain = context.new_chain();
        let header = chain.begin_encrypt()?;
        Ok(Self {
            context,
            chain,
            pending: BytesMut::new(),
            header: Some(header),
        })
    }

    /// Feed plaintext, returning ciphertext for every completed block
    pub fn update(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let bs = self.context.block_size();
        self.pending.extend_from_slice(input);

        let mut out = self.header.take().unwrap_or_default();
        let ready = (self.pending.len() / bs) * bs;
        if ready > 0 {
            let blocks = self.pending.split_to(ready);
            out.extend(self.chain.encrypt(self.context.cipher(), &blocks, self.context.config().workers)?);
        }
        Ok(out)
    }

    /// Pad the remaining bytes and return the final ciphertext
    ///
    /// An empty tail still yields one full block of padding.
    pub fn finalize(mut self) -> Result<Vec<u8>> {
        let mut out = self.header.take().unwrap_or_default();
        let padded = add_padding(&self.pending, self.context.block_size(), self.context.padding())?;
        out.extend(self.chain.encrypt(self.context.cipher(), &padded, self.context.config().workers)?);
        Ok(out)
    }
}

/// Incremental decryptor over one message
///
/// The final two blocks are held back until [`finalize`](Self::finalize)
/// so padding is only ever stripped from the true end of the message.
pub struct StreamDecryptor<'a, C: BlockCipher> {
    /// Context providing the cipher, mode and padding
    context: &'a CipherContext<C>,

    /// Chaining state carried between buffers
    chain: ChainState,

    /// Ciphertext not yet decrypted
    pending: BytesMut,

    /// Whether the mode header has been consumed
    header_read: bool,
}

impl<'a, C: BlockCipher> StreamDecryptor<'a, C> {
    /// Start decrypting a new message
    pub fn new(context: &'a CipherContext<C>) -> Self {
        let chain = context.new_chain();
        let header_read = chain.header_len() == 0;
        Self {
            context,
            chain,
            pending: BytesMut::new(),
            header_read,
        }
    }

    fn read_header(&mut self) -> Result<bool> {
        if !self.header_read && self.pending.len() >= self.chain.header_len() {
            let header = self.pending.split_to(self.chain.header_len());
            self.chain.begin_decrypt(&header)?;
            self.header_read = true;
        }
        Ok(self.header_read)
    }

    /// Feed ciphertext, returning plaintext that is certainly not padding
    pub fn update(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let bs = self.context.block_size();
        self.pending.extend_from_slice(input);
        if !self.read_header()? {
            return Ok(Vec::new());
        }

        let ready = (self.pending.len().saturating_sub(2 * bs) / bs) * bs;
        if ready == 0 {
            return Ok(Vec::new());
        }
        let blocks = self.pending.split_to(ready);
        self.chain.decrypt(self.context.cipher(), &blocks, self.context.config().workers)
    }

    /// Decrypt the held-back tail and strip its padding
    pub fn finalize(mut self) -> Result<Vec<u8>> {
        if !self.read_header()? {
            return data_err!("data too short to contain delta");
        }
        let bs = self.context.block_size();
        if self.pending.len() % bs != 0 {
            return data_err!("ciphertext is not a multiple of the block size {}", bs);
        }
        let tail = self.chain.decrypt(self.context.cipher(), &self.pending, self.context.config().workers)?;
        remove_padding(&tail, self.context.padding()).inspect_err(|e| {
            log::warn!("Rejected stream with bad {} padding: {}", self.context.padding(), e);
        })
    }
}

fn read_some<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    loop {
        match reader.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

impl<C: BlockCipher> CipherContext<C> {
    fn stream_buffer_len(&self) -> usize {
        self.config().stream_buffer_blocks * self.block_size()
    }

    /// Encrypt everything `reader` yields into `writer`
    ///
    /// Returns the number of ciphertext bytes written.
    pub fn encrypt_stream<R: Read, W: Write>(&self, mut reader: R, mut writer: W) -> Result<u64> {
        let mut encryptor = StreamEncryptor::new(self)?;
        let mut buf = vec![0u8; self.stream_buffer_len()];
        let mut written = 0u64;

        loop {
            let n = read_some(&mut reader, &mut buf)?;
            if n == 0 {
                break;
            }
            let out = encryptor.update(&buf[..n])?;
            writer.write_all(&out)?;
            written += out.len() as u64;
            log::trace!("Encrypted {} bytes from stream", n);
        }

        let tail = encryptor.finalize()?;
        writer.write_all(&tail)?;
        writer.flush()?;
        written += tail.len() as u64;

        log::debug!("Stream encryption complete: {} bytes written", written);
        Ok(written)
    }

    /// Decrypt everything `reader` yields into `writer`
    ///
    /// Returns the number of plaintext bytes written.
    pub fn decrypt_stream<R: Read, W: Write>(&self, mut reader: R, mut writer: W) -> Result<u64> {
        let mut decryptor = StreamDecryptor::new(self);
        let mut buf = vec![0u8; self.stream_buffer_len()];
        let mut written = 0u64;

        loop {
            let n = read_some(&mut reader, &mut buf)?;
            if n == 0 {
                break;
            }
            let out = decryptor.update(&buf[..n])?;
            writer.write_all(&out)?;
            written += out.len() as u64;
            log::trace!("Decrypted {} bytes from stream", n);
        }

        let tail = decryptor.finalize()?;
        writer.write_all(&tail)?;
        writer.flush()?;
        written += tail.len() as u64;

        log::debug!("Stream decryption complete: {} bytes written", written);
        Ok(written)
    }

    /// Encrypt the file at `input` into a new file at `output`
    pub fn encrypt_file<P: AsRef<Path>, Q: AsRef<Path>>(&self, input: P, output: Q) -> Result<()> {
        let reader = File::open(input.as_ref())?;
        let writer = BufWriter::new(File::create(output.as_ref())?);
        self.encrypt_stream(reader, writer)?;
        Ok(())
    }

    /// Decrypt the file at `input` into a new file at `output`
    pub fn decrypt_file<P: AsRef<Path>, Q: AsRef<Path>>(&self, input: P, output: Q) -> Result<()> {
        let reader = File::open(input.as_ref())?;
        let writer = BufWriter::new(File::create(output.as_ref())?);
        self.decrypt_stream(reader, writer)?;
        Ok(())
    }
}
