//! Ratcliff/Obershelp matching blocks over character sequences.
//!
//! `longer` sequences of 200+ characters get the "popular character" heuristic: characters
//! occurring more than `len / 100 + 1` times never seed a block, though they may still extend one.

use std::collections::HashMap;

const AUTOJUNK_MIN_LEN: usize = 200;

/// A run of `size` equal characters starting at `a[a_start]` and `b[b_start]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Block {
    pub a_start: usize,
    pub b_start: usize,
    pub size: usize,
}

/// Precomputed index of `b` used to find matching blocks against `a`.
pub struct SequenceMatcher<'s> {
    a: &'s [char],
    b: &'s [char],
    b2j: HashMap<char, Vec<usize>>,
}

impl<'s> SequenceMatcher<'s> {
    pub fn new(a: &'s [char], b: &'s [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            b2j.entry(*c).or_default().push(j);
        }
        let n = b.len();
        if n >= AUTOJUNK_MIN_LEN {
            let ntest = n / 100 + 1;
            b2j.retain(|_, idxs| idxs.len() <= ntest);
        }
        Self { a, b, b2j }
    }

    /// Longest matching block in `a[alo..ahi]` x `b[blo..bhi]`.
    /// Ties resolve to the block starting earliest in `a`, then earliest in `b`.
    fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let (a, b) = (self.a, self.b);
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut new_j2len: HashMap<usize, usize> = HashMap::new();
            if let Some(js) = self.b2j.get(c) {
                for &j in js {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    new_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = new_j2len;
        }

        while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && a[best_i + best_size] == b[best_j + best_size]
        {
            best_size += 1;
        }

        Block {
            a_start: best_i,
            b_start: best_j,
            size: best_size,
        }
    }

    /// All non-adjacent matching blocks in ascending order, terminated by `(len_a, len_b, 0)`.
    pub fn matching_blocks(&self) -> Vec<Block> {
        let (la, lb) = (self.a.len(), self.b.len());
        let mut queue = vec![(0, la, 0, lb)];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let block = self.find_longest_match(alo, ahi, blo, bhi);
            if block.size == 0 {
                continue;
            }
            let (i, j, k) = (block.a_start, block.b_start, block.size);
            blocks.push(block);
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        blocks.sort();

        let mut merged: Vec<Block> = Vec::with_capacity(blocks.len() + 1);
        for block in blocks {
            match merged.last_mut() {
                Some(last)
                    if last.a_start + last.size == block.a_start
                        && last.b_start + last.size == block.b_start =>
                {
                    last.size += block.size;
                }
                _ => merged.push(block),
            }
        }
        merged.push(Block {
            a_start: la,
            b_start: lb,
            size: 0,
        });
        merged
    }

    /// Similarity in `[0, 1]`: twice the matched character count over the combined length.
    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matches: usize = self.matching_blocks().iter().map(|b| b.size).sum();
        2.0 * matches as f64 / total as f64
    }
}
