//! Recurring-pattern detection over event-name sequences.
//!
//! The miner rank-encodes the names, builds a suffix array with the
//! doubling scheme, derives the LCP array with Kasai's algorithm, and reads
//! repeated motifs out of LCP intervals. Motifs are contiguous name
//! subsequences of length ≥ `min_len`; a motif must occur at least twice
//! without overlap to count as repeated.

use crate::simulate::SimulatedEvent;
use serde::Serialize;
use std::collections::HashMap;

/// Miner knobs.
#[derive(Debug, Clone)]
pub struct MinerOptions {
    /// Minimum motif length (events)
    pub min_len: usize,
    /// Number of motifs to keep after sorting
    pub top_k: usize,
    /// Sequences longer than this are truncated before mining
    pub max_sequence_length: usize,
}

impl Default for MinerOptions {
    fn default() -> Self {
        Self {
            min_len: 2,
            top_k: 10,
            max_sequence_length: 1 << 17,
        }
    }
}

/// One repeated motif.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Motif {
    /// The event names of the motif, in order
    pub motif: Vec<String>,
    pub length: usize,
    /// Non-overlapping occurrence count; at least 2
    pub frequency: usize,
}

/// Miner output: the motifs plus whether the input was truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinedPatterns {
    pub motifs: Vec<Motif>,
    /// True when the sequence exceeded `max_sequence_length`
    pub truncated: bool,
}

/// Mine repeated motifs from a simulated sequence.
///
/// Results are sorted by `(length desc, frequency desc, motif asc)` and cut
/// to `top_k`.
pub fn mine_patterns(events: &[SimulatedEvent], options: &MinerOptions) -> MinedPatterns {
    let truncated = events.len() > options.max_sequence_length;
    let events = &events[..events.len().min(options.max_sequence_length)];
    let names: Vec<&str> = events.iter().map(|e| e.event_name.as_str()).collect();

    let min_len = options.min_len.max(2);
    if names.len() < min_len * 2 {
        return MinedPatterns {
            motifs: Vec::new(),
            truncated,
        };
    }

    // Rank-encode names; sorted order keeps the encoding deterministic.
    let mut unique: Vec<&str> = names.clone();
    unique.sort_unstable();
    unique.dedup();
    let ranks: Vec<u32> = names
        .iter()
        .map(|name| unique.binary_search(name).unwrap_or(0) as u32)
        .collect();

    let sa = suffix_array(&ranks);
    let lcp = lcp_array(&ranks, &sa);

    // Collect candidate motifs: every LCP entry ≥ min_len names a repeated
    // prefix; its occurrence set is the maximal LCP interval around it.
    let mut candidates: HashMap<&[u32], Vec<usize>> = HashMap::new();
    for i in 1..sa.len() {
        let length = lcp[i];
        if length < min_len {
            continue;
        }
        let motif = &ranks[sa[i]..sa[i] + length];
        if candidates.contains_key(motif) {
            continue;
        }
        // Expand to all suffixes sharing this prefix.
        let mut low = i;
        while low > 1 && lcp[low - 1] >= length {
            low -= 1;
        }
        let mut high = i;
        while high + 1 < sa.len() && lcp[high + 1] >= length {
            high += 1;
        }
        let mut positions: Vec<usize> = sa[low - 1..=high].to_vec();
        positions.sort_unstable();
        candidates.insert(motif, positions);
    }

    let mut motifs: Vec<Motif> = candidates
        .into_iter()
        .filter_map(|(motif, positions)| {
            let frequency = non_overlapping_count(&positions, motif.len());
            if frequency < 2 {
                return None;
            }
            Some(Motif {
                motif: motif.iter().map(|&id| unique[id as usize].to_string()).collect(),
                length: motif.len(),
                frequency,
            })
        })
        .collect();

    motifs.sort_by(|a, b| {
        b.length
            .cmp(&a.length)
            .then(b.frequency.cmp(&a.frequency))
            .then(a.motif.cmp(&b.motif))
    });
    motifs.truncate(options.top_k);

    MinedPatterns { motifs, truncated }
}

/// Greedy left-to-right count of non-overlapping occurrences.
fn non_overlapping_count(sorted_positions: &[usize], length: usize) -> usize {
    let mut count = 0;
    let mut next_free = 0;
    for &position in sorted_positions {
        if position >= next_free {
            count += 1;
            next_free = position + length;
        }
    }
    count
}

/// Suffix array by prefix doubling.
///
/// Each round sorts by (rank, rank k ahead) pairs and re-ranks, doubling
/// `k` until all ranks are distinct.
fn suffix_array(s: &[u32]) -> Vec<usize> {
    let n = s.len();
    let mut sa: Vec<usize> = (0..n).collect();
    let mut rank: Vec<i64> = s.iter().map(|&x| x as i64).collect();
    let mut tmp = vec![0i64; n];
    let mut k = 1;

    while k < n {
        let key = |i: usize, rank: &[i64]| {
            (rank[i], if i + k < n { rank[i + k] } else { -1 })
        };
        sa.sort_unstable_by_key(|&i| key(i, &rank));

        tmp[sa[0]] = 0;
        for i in 1..n {
            tmp[sa[i]] = tmp[sa[i - 1]] + i64::from(key(sa[i], &rank) > key(sa[i - 1], &rank));
        }
        rank.copy_from_slice(&tmp);

        if rank[sa[n - 1]] as usize == n - 1 {
            break;
        }
        k <<= 1;
    }
    sa
}

/// LCP array via Kasai's algorithm; `lcp[i]` is the common prefix length of
/// the suffixes at `sa[i - 1]` and `sa[i]`, with `lcp[0] = 0`.
fn lcp_array(s: &[u32], sa: &[usize]) -> Vec<usize> {
    let n = s.len();
    let mut rank = vec![0usize; n];
    for (i, &pos) in sa.iter().enumerate() {
        rank[pos] = i;
    }

    let mut lcp = vec![0usize; n];
    let mut h = 0usize;
    for i in 0..n {
        if rank[i] > 0 {
            let j = sa[rank[i] - 1];
            while i + h < n && j + h < n && s[i + h] == s[j + h] {
                h += 1;
            }
            lcp[rank[i]] = h;
            h = h.saturating_sub(1);
        } else {
            h = 0;
        }
    }
    lcp
}
