use std::collections::HashMap;

/// Sequences at least this long get popular-element pruning.
const POPULAR_MIN_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingBlock {
    pub expected_start: usize,
    pub actual_start: usize,
    pub len: usize,
}

/// Ratcliff/Obershelp similarity `2 * M / T` between two label sequences.
///
/// `M` is the number of elements covered by recursively found longest
/// matching blocks, `T` the combined length. Two empty sequences score 1.0.
pub fn similarity_ratio<S: AsRef<str>, T: AsRef<str>>(expected: &[S], actual: &[T]) -> f64 {
    let total = expected.len() + actual.len();
    if total == 0 {
        return 1.0;
    }
    let matched: usize = matching_blocks(expected, actual)
        .iter()
        .map(|block| block.len)
        .sum();
    2.0 * matched as f64 / total as f64
}

/// Non-overlapping matching blocks, ordered by position in both sequences.
pub fn matching_blocks<S: AsRef<str>, T: AsRef<str>>(
    expected: &[S],
    actual: &[T],
) -> Vec<MatchingBlock> {
    let a: Vec<&str> = expected.iter().map(AsRef::as_ref).collect();
    let b: Vec<&str> = actual.iter().map(AsRef::as_ref).collect();
    let index = ActualIndex::new(&b);

    let mut blocks = Vec::new();
    let mut queue = vec![(0usize, a.len(), 0usize, b.len())];
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let block = find_longest_match(&a, &b, &index, alo, ahi, blo, bhi);
        if block.len == 0 {
            continue;
        }
        let (i, j, k) = (block.expected_start, block.actual_start, block.len);
        blocks.push(block);
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
    }
    blocks.sort_by_key(|block| (block.expected_start, block.actual_start));
    blocks
}

/// Positions of each label in the actual sequence. Labels that are too
/// frequent in a long sequence are left out and can only extend a match.
struct ActualIndex<'a> {
    positions: HashMap<&'a str, Vec<usize>>,
}

impl<'a> ActualIndex<'a> {
    fn new(b: &[&'a str]) -> Self {
        let mut positions: HashMap<&'a str, Vec<usize>> = HashMap::new();
        for (j, label) in b.iter().enumerate() {
            positions.entry(*label).or_default().push(j);
        }
        if b.len() >= POPULAR_MIN_LEN {
            let limit = b.len() / 100 + 1;
            positions.retain(|_, indices| indices.len() <= limit);
        }
        Self { positions }
    }

    fn get(&self, label: &str) -> &[usize] {
        self.positions.get(label).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn find_longest_match(
    a: &[&str],
    b: &[&str],
    index: &ActualIndex<'_>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> MatchingBlock {
    let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0usize);

    // Length of the match ending at (i - 1, j), keyed by j.
    let mut run_len: HashMap<usize, usize> = HashMap::new();
    for (i, label) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next_run_len = HashMap::new();
        for &j in index.get(label) {
            if j < blo {
                continue;
            }
            if j >= bhi {
                break;
            }
            let k = j
                .checked_sub(1)
                .and_then(|prev| run_len.get(&prev))
                .copied()
                .unwrap_or(0)
                + 1;
            next_run_len.insert(j, k);
            if k > best_len {
                best_i = i + 1 - k;
                best_j = j + 1 - k;
                best_len = k;
            }
        }
        run_len = next_run_len;
    }

    // Pruned labels never seed a match but may still extend one.
    while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
        best_i -= 1;
        best_j -= 1;
        best_len += 1;
    }
    while best_i + best_len < ahi
        && best_j + best_len < bhi
        && a[best_i + best_len] == b[best_j + best_len]
    {
        best_len += 1;
    }

    MatchingBlock {
        expected_start: best_i,
        actual_start: best_j,
        len: best_len,
    }
}
