// Copyright 2026 Logan Magee
//
// SPDX-License-Identifier: Apache-2.0

use std::io;

use rastore::RandomAccess;

use crate::cell::GroupCell;

/// One unit of pending refinement work.
///
/// Tasks run on an explicit LIFO stack. A task may push further tasks, which
/// run before anything that was already queued; pushing the sub-ranges of a
/// partition in the order greater, finalize, less therefore reproduces the
/// left-to-right depth-first order of the natural recursion without growing
/// the call stack.
enum SplitTask {
    /// Reorder `group[start..start + length]` by each suffix's rank at
    /// offset `inverse_offset`.
    Refine {
        start: i32,
        length: i32,
        inverse_offset: i32,
    },
    /// Record `group[start..end]` as one resolved rank group.
    Finalize { start: i32, end: i32 },
}

/// Refines a run of suffixes currently tied at one rank.
///
/// On entry, `group[start..start + length]` holds the offsets of suffixes
/// that share a rank when compared to depth `inverse_offset`. On return the
/// run is reordered by each suffix's rank at that additional offset:
/// newly distinguished suffixes carry `-1` sentinels in the group array and
/// final ranks in the inverse array, while suffixes still tied at the deeper
/// offset remain in place for a later doubling round.
pub(crate) fn split<S: RandomAccess + ?Sized>(
    group: &mut S,
    inverse: &mut S,
    start: i32,
    length: i32,
    inverse_offset: i32,
    threshold: i32,
) -> io::Result<()> {
    let mut tasks = vec![SplitTask::Refine {
        start,
        length,
        inverse_offset,
    }];

    while let Some(task) = tasks.pop() {
        match task {
            SplitTask::Refine {
                start,
                length,
                inverse_offset,
            } => refine(group, inverse, start, length, inverse_offset, threshold, &mut tasks)?,
            SplitTask::Finalize { start, end } => finalize(group, inverse, start, end)?,
        }
    }

    Ok(())
}

fn refine<S: RandomAccess + ?Sized>(
    group: &mut S,
    inverse: &mut S,
    start: i32,
    length: i32,
    inverse_offset: i32,
    threshold: i32,
    tasks: &mut Vec<SplitTask>,
) -> io::Result<()> {
    if length < threshold {
        return refine_by_selection(group, inverse, start, length, inverse_offset);
    }

    // The rank of the midpoint element is the partition key.
    let pivot = group.read_int_at(start + length / 2)?;
    let x = inverse.read_int_at(pivot + inverse_offset)?;

    // Count the zones so the partition can place elements directly.
    let mut less = 0;
    let mut equal = 0;
    group.seek_to_int(start)?;
    for _ in 0..length {
        let suffix = group.read_int()?;
        let key = inverse.read_int_at(suffix + inverse_offset)?;
        if key < x {
            less += 1;
        } else if key == x {
            equal += 1;
        }
    }

    // jj is the first slot of the equal zone, kk the first of the greater
    // zone.
    let jj = start + less;
    let kk = jj + equal;

    // Ternary partition: sweep the less zone, swapping misplaced elements
    // into the next free slot of their home zone, then compact the equal
    // zone the same way.
    let mut j = 0;
    let mut k = 0;
    let mut i = start;
    while i < jj {
        let suffix = group.read_int_at(i)?;
        let key = inverse.read_int_at(suffix + inverse_offset)?;

        if key < x {
            i += 1;
        } else if key == x {
            let displaced = group.read_int_at(jj + j)?;
            group.write_int_at(i, displaced)?;
            group.write_int_at(jj + j, suffix)?;
            j += 1;
        } else {
            let displaced = group.read_int_at(kk + k)?;
            group.write_int_at(i, displaced)?;
            group.write_int_at(kk + k, suffix)?;
            k += 1;
        }
    }

    while jj + j < kk {
        let suffix = group.read_int_at(jj + j)?;
        if inverse.read_int_at(suffix + inverse_offset)? == x {
            j += 1;
        } else {
            let displaced = group.read_int_at(kk + k)?;
            group.write_int_at(jj + j, displaced)?;
            group.write_int_at(kk + k, suffix)?;
            k += 1;
        }
    }

    // Push order matters: popping must run the less range first to keep
    // left-to-right depth-first order.
    if start + length > kk {
        tasks.push(SplitTask::Refine {
            start: kk,
            length: start + length - kk,
            inverse_offset,
        });
    }
    tasks.push(SplitTask::Finalize { start: jj, end: kk });
    if jj > start {
        tasks.push(SplitTask::Refine {
            start,
            length: jj - start,
            inverse_offset,
        });
    }

    Ok(())
}

/// Quadratic grouping for ranges too short to be worth partitioning.
///
/// Repeatedly selects the minimum key among the remaining elements, swapping
/// all its ties into the front slots, then finalizes that tie set in one
/// step.
fn refine_by_selection<S: RandomAccess + ?Sized>(
    group: &mut S,
    inverse: &mut S,
    start: i32,
    length: i32,
    inverse_offset: i32,
) -> io::Result<()> {
    let mut outer = start;
    while outer < start + length {
        // tied counts how many of the leading slots hold the current
        // minimum key x.
        let mut tied = 1;
        let mut x = inverse.read_int_at(group.read_int_at(outer)? + inverse_offset)?;

        for inner in 1..(start + length - outer) {
            let key = inverse.read_int_at(group.read_int_at(outer + inner)? + inverse_offset)?;
            if key < x {
                x = key;
                tied = 0;
            }
            if key == x {
                let front = group.read_int_at(outer + tied)?;
                let candidate = group.read_int_at(outer + inner)?;
                group.write_int_at(outer + tied, candidate)?;
                group.write_int_at(outer + inner, front)?;
                tied += 1;
            }
        }

        // Everything in the front slots ties at the minimum; they share the
        // rank of the last slot they occupy.
        group.seek_to_int(outer)?;
        for _ in 0..tied {
            let suffix = group.read_int()?;
            inverse.write_int_at(suffix, outer + tied - 1)?;
        }
        if tied == 1 {
            group.write_int_at(outer, GroupCell::Finalized(1).encode())?;
        }

        outer += tied;
    }

    Ok(())
}

/// Records `group[start..end]` as one resolved group: every member receives
/// the shared rank `end - 1`, and a singleton is additionally marked as a
/// finalized run in the group array.
fn finalize<S: RandomAccess + ?Sized>(
    group: &mut S,
    inverse: &mut S,
    start: i32,
    end: i32,
) -> io::Result<()> {
    group.seek_to_int(start)?;
    for _ in start..end {
        let suffix = group.read_int()?;
        inverse.write_int_at(suffix, end - 1)?;
    }

    if start == end - 1 {
        group.write_int_at(start, GroupCell::Finalized(1).encode())?;
    }

    Ok(())
}
