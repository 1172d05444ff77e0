// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Bounded parallel fills over complex buffers.
//!
//! Every parallel builder in the crate funnels through one of the two
//! primitives here. Both take an explicit worker count, partition the index
//! space so that each cell is written by exactly one worker, and leave the
//! scheduling of the resulting tasks to rayon's work-stealing pool. The
//! output buffer is not zero-initialized; the partitioning guarantees every
//! cell is written before the buffer is observed.

use crate::Complex;
use num_traits::Zero;
use rayon::prelude::*;
use std::mem::{ManuallyDrop, MaybeUninit};

/// Clamps a worker count to the number of available work items.
/// Callers reject a count of zero before reaching this module.
pub(crate) fn clamp_workers(workers: usize, items: usize) -> usize {
    workers.min(items).max(1)
}

/// Fills a buffer of `len` cells with `value(index)`, partitioning `0..len`
/// into `workers` contiguous chunks.
pub(crate) fn fill<F>(len: usize, workers: usize, value: F) -> Vec<Complex>
where
    F: Fn(usize) -> Complex + Sync,
{
    let workers = clamp_workers(workers, len);
    if workers == 1 {
        return (0..len).map(value).collect();
    }

    let mut buffer: Vec<MaybeUninit<Complex>> = Vec::with_capacity(len);
    // SAFETY: `MaybeUninit` cells do not require initialization.
    unsafe { buffer.set_len(len) };

    let chunk_len = len.div_ceil(workers);
    buffer
        .par_chunks_mut(chunk_len)
        .enumerate()
        .for_each(|(chunk, cells)| {
            let start = chunk * chunk_len;
            for (offset, cell) in cells.iter_mut().enumerate() {
                cell.write(value(start + offset));
            }
        });

    // SAFETY: the chunks cover `0..len` without overlap and the loop above
    // wrote every cell of every chunk.
    unsafe { assume_init(buffer) }
}

/// Fills a column-major `row_count` x `column_count` buffer where producing a
/// row is expensive: `row(r)` runs once per row and its result is shared by
/// `cell(r, c, &row)` across that row's columns.
///
/// Rows are partitioned by worker id with a stride equal to the worker
/// count, so the column-major writes of different workers never overlap.
pub(crate) fn fill_by_rows<R, RowF, CellF>(
    row_count: usize,
    column_count: usize,
    workers: usize,
    row: RowF,
    cell: CellF,
) -> Vec<Complex>
where
    RowF: Fn(usize) -> R + Sync,
    CellF: Fn(usize, usize, &R) -> Complex + Sync,
{
    let len = row_count * column_count;
    let workers = clamp_workers(workers, row_count);
    if workers == 1 {
        let mut buffer = vec![Complex::zero(); len];
        for r in 0..row_count {
            let shared = row(r);
            for c in 0..column_count {
                buffer[c * row_count + r] = cell(r, c, &shared);
            }
        }
        return buffer;
    }

    let mut buffer: Vec<MaybeUninit<Complex>> = Vec::with_capacity(len);
    // SAFETY: `MaybeUninit` cells do not require initialization.
    unsafe { buffer.set_len(len) };
    let writer = SharedWriter {
        cells: buffer.as_mut_ptr(),
        len,
    };

    (0..workers).into_par_iter().for_each(|worker| {
        let mut r = worker;
        while r < row_count {
            let shared = row(r);
            for c in 0..column_count {
                // SAFETY: workers own disjoint row classes
                // (`r ≡ worker (mod workers)`), so no two workers write the
                // same cell, and `c * row_count + r < len`.
                unsafe { writer.write(c * row_count + r, cell(r, c, &shared)) };
            }
            r += workers;
        }
    });

    // SAFETY: the row classes of the `workers` tasks cover every row, and
    // each task wrote every column of its rows.
    unsafe { assume_init(buffer) }
}

/// Converts a fully-written `MaybeUninit` buffer into an initialized one.
///
/// # Safety
///
/// Every cell of `buffer` must have been written.
unsafe fn assume_init(buffer: Vec<MaybeUninit<Complex>>) -> Vec<Complex> {
    let mut buffer = ManuallyDrop::new(buffer);
    let (ptr, len, capacity) = (buffer.as_mut_ptr(), buffer.len(), buffer.capacity());
    // SAFETY: `MaybeUninit<Complex>` has the same layout as `Complex` and the
    // caller guarantees every cell is initialized.
    unsafe { Vec::from_raw_parts(ptr.cast::<Complex>(), len, capacity) }
}

/// Shared mutable access to an output buffer whose cells are written by
/// disjoint workers.
struct SharedWriter {
    cells: *mut MaybeUninit<Complex>,
    len: usize,
}

// SAFETY: every call site partitions the index space so that no two workers
// write the same cell; see `fill_by_rows`.
unsafe impl Sync for SharedWriter {}

impl SharedWriter {
    /// # Safety
    ///
    /// `index` must be in bounds and must not be written by any other worker.
    unsafe fn write(&self, index: usize, value: Complex) {
        debug_assert!(index < self.len);
        // SAFETY: guaranteed by the caller.
        unsafe { (*self.cells.add(index)).write(value) };
    }
}
