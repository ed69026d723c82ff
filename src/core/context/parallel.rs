/*!
Bounded worker pool for block-independent modes.

The input is cut into contiguous runs of whole blocks, one per worker,
and each worker writes into the matching run of the output buffer. The
position of every output block is fixed by its index, so the result
does not depend on the order in which workers finish.
*/

use std::thread;

use crate::core::constants::PARALLEL_MIN_BLOCKS;
use crate::core::error::{Error, Result};

/// Number of workers worth spawning for `blocks` blocks
pub fn effective_workers(blocks: usize, max_workers: usize) -> usize {
    blocks.div_ceil(PARALLEL_MIN_BLOCKS).clamp(1, max_workers.max(1))
}

/// Apply `f(index, block)` to every block of `data`
///
/// `data.len()` must be a multiple of `block_size`. Each call must return
/// exactly one block. The first failing block (lowest index) is reported
/// as [`Error::Worker`]; the partial output is dropped.
pub fn process_blocks<F>(data: &[u8], block_size: usize, max_workers: usize, f: F) -> Result<Vec<u8>>
where
    F: Fn(usize, &[u8]) -> Result<Vec<u8>> + Sync,
{
    let blocks = data.len() / block_size;
    let mut out = vec![0u8; data.len()];
    if blocks == 0 {
        return Ok(out);
    }

    let workers = effective_workers(blocks, max_workers);
    if workers == 1 {
        run(data, &mut out, block_size, 0, &f)?;
        return Ok(out);
    }

    let chunk_len = blocks.div_ceil(workers) * block_size;
    thread::scope(|scope| {
        let handles: Vec<_> = data
            .chunks(chunk_len)
            .zip(out.chunks_mut(chunk_len))
            .enumerate()
            .map(|(chunk, (input, output))| {
                let f = &f;
                let first_block = chunk * chunk_len / block_size;
                scope.spawn(move || run(input, output, block_size, first_block, f))
            })
            .collect();

        let mut first_error = None;
        for handle in handles {
            let outcome = handle
                .join()
                .unwrap_or_else(|_| Err(Error::Internal("block worker panicked".into())));
            if let Err(e) = outcome {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    })?;

    Ok(out)
}

fn run<F>(input: &[u8], output: &mut [u8], block_size: usize, first_block: usize, f: &F) -> Result<()>
where
    F: Fn(usize, &[u8]) -> Result<Vec<u8>>,
{
    for (i, (src, dst)) in input
        .chunks(block_size)
        .zip(output.chunks_mut(block_size))
        .enumerate()
    {
        let block = first_block + i;
        let processed = f(block, src).map_err(|e| Error::Worker {
            block,
            source: Box::new(e),
        })?;
        if processed.len() != dst.len() {
            return Err(Error::Internal(format!(
                "block {} produced {} bytes, expected {}",
                block,
                processed.len(),
                dst.len()
            )));
        }
        dst.copy_from_slice(&processed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::CryptoError;

    #[test]
    fn test_worker_count_is_bounded() {
        assert_eq!(effective_workers(1, 8), 1);
        assert_eq!(effective_workers(PARALLEL_MIN_BLOCKS * 3, 8), 3);
        assert_eq!(effective_workers(PARALLEL_MIN_BLOCKS * 100, 8), 8);
        assert_eq!(effective_workers(PARALLEL_MIN_BLOCKS * 100, 0), 1);
    }

    #[test]
    fn test_output_is_index_addressed() {
        let blocks = PARALLEL_MIN_BLOCKS * 5 + 3;
        let data: Vec<u8> = (0..blocks * 4).map(|i| (i / 4) as u8).collect();
        let expected: Vec<u8> = data.iter().map(|b| b.wrapping_add(1)).collect();

        for workers in [1usize, 2, 4, 7] {
            let out = process_blocks(&data, 4, workers, |_, block| {
                Ok(block.iter().map(|b| b.wrapping_add(1)).collect())
            })
            .unwrap();
            assert_eq!(out, expected);
        }
    }

    #[test]
    fn test_indices_are_global() {
        let blocks = PARALLEL_MIN_BLOCKS * 4;
        let data = vec![0u8; blocks * 2];
        let out = process_blocks(&data, 2, 4, |index, _| Ok((index as u16).to_be_bytes().to_vec())).unwrap();
        for (i, pair) in out.chunks(2).enumerate() {
            assert_eq!(u16::from_be_bytes([pair[0], pair[1]]) as usize, i);
        }
    }

    #[test]
    fn test_lowest_failing_block_wins() {
        let blocks = PARALLEL_MIN_BLOCKS * 4;
        let data = vec![0u8; blocks];
        let result = process_blocks(&data, 1, 4, |index, block| {
            if index == 70 || index == 200 {
                Err(Error::Crypto(CryptoError::KeyNotSet))
            } else {
                Ok(block.to_vec())
            }
        });
        match result {
            Err(Error::Worker { block, source }) => {
                assert_eq!(block, 70);
                assert!(matches!(*source, Error::Crypto(CryptoError::KeyNotSet)));
            }
            other => panic!("unexpected result: {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn test_empty_input() {
        let out = process_blocks(&[], 16, 4, |_, b| Ok(b.to_vec())).unwrap();
        assert!(out.is_empty());
    }
}
