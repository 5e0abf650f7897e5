//! Sorted set: rank-aware skip list plus a member index.
//!
//! Members are unique strings ordered by `(score ascending, member bytes
//! ascending)`. The skip list keeps a span on every link (the number of
//! level-0 steps the link crosses), which makes rank queries and
//! rank-range extraction `O(log n + k)`; the `FxHashMap` member index
//! makes score lookup `O(1)` and gives removals their starting point.
//!
//! Nodes live in an arena `Vec` addressed by stable `u32` indices; `None`
//! stands for the head sentinel, whose tower is kept in `head`.

use std::cmp::Ordering;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use smallvec::{smallvec, SmallVec};

const MAX_LEVEL: usize = 32;

/// One forward link in a node's tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Link {
    next: Option<u32>,
    /// Level-0 steps this link crosses.
    span: u32,
}

impl Link {
    fn empty() -> Self {
        Link { next: None, span: 0 }
    }
}

#[derive(Debug, Clone)]
struct Node {
    member: String,
    score: f64,
    /// Level-0 back reference for reverse traversal.
    prev: Option<u32>,
    links: SmallVec<[Link; 4]>,
}

/// Inclusive/exclusive score interval for count, range and removal verbs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRange {
    /// Lower bound.
    pub min: f64,
    /// Whether `min` itself is inside the range.
    pub min_inclusive: bool,
    /// Upper bound.
    pub max: f64,
    /// Whether `max` itself is inside the range.
    pub max_inclusive: bool,
}

impl ScoreRange {
    /// Build a range from explicit bounds and inclusivity flags.
    pub fn new(min: f64, min_inclusive: bool, max: f64, max_inclusive: bool) -> Self {
        ScoreRange {
            min,
            min_inclusive,
            max,
            max_inclusive,
        }
    }

    /// Closed interval `[min, max]`.
    pub fn inclusive(min: f64, max: f64) -> Self {
        Self::new(min, true, max, true)
    }
}

/// Score aggregation mode for ZINTERSTORE / ZUNIONSTORE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    /// Sum of weighted per-set scores.
    Sum,
    /// Minimum weighted per-set score.
    Min,
    /// Maximum weighted per-set score.
    Max,
}

impl Aggregate {
    /// Fold one more weighted score into the accumulator.
    pub fn apply(self, acc: f64, value: f64) -> f64 {
        match self {
            Aggregate::Sum => acc + value,
            Aggregate::Min => acc.min(value),
            Aggregate::Max => acc.max(value),
        }
    }

    /// Parse a command token, case-insensitively.
    pub fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("SUM") {
            Some(Aggregate::Sum)
        } else if token.eq_ignore_ascii_case("MIN") {
            Some(Aggregate::Min)
        } else if token.eq_ignore_ascii_case("MAX") {
            Some(Aggregate::Max)
        } else {
            None
        }
    }
}

/// Score-ordered collection of unique members.
#[derive(Debug, Clone)]
pub struct ZSet {
    map: FxHashMap<String, f64>,
    nodes: Vec<Node>,
    free: Vec<u32>,
    head: Vec<Link>,
    level: usize,
    tail: Option<u32>,
    len: u32,
    rng: SmallRng,
}

impl Default for ZSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ZSet {
    /// Create an empty sorted set.
    pub fn new() -> Self {
        ZSet {
            map: FxHashMap::default(),
            nodes: Vec::new(),
            free: Vec::new(),
            head: vec![Link::empty()],
            level: 1,
            tail: None,
            len: 0,
            rng: SmallRng::from_entropy(),
        }
    }

    /// Number of members.
    pub fn zcard(&self) -> u32 {
        self.len
    }

    /// True when the set holds no members.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Score of `member`, if present.
    pub fn zscore(&self, member: &str) -> Option<f64> {
        self.map.get(member).copied()
    }

    /// Insert `member` with `score`, or update its score in place.
    ///
    /// Returns `true` for a new insertion, `false` for an update.
    pub fn zadd(&mut self, score: f64, member: &str) -> bool {
        match self.map.get(member).copied() {
            Some(old) => {
                if old.total_cmp(&score) != Ordering::Equal {
                    self.unlink(old, member);
                    self.link(score, member.to_string());
                    self.map.insert(member.to_string(), score);
                }
                false
            }
            None => {
                self.link(score, member.to_string());
                self.map.insert(member.to_string(), score);
                true
            }
        }
    }

    /// Remove `member`. Returns `true` if it was present.
    pub fn zrem(&mut self, member: &str) -> bool {
        match self.map.remove(member) {
            Some(score) => {
                self.unlink(score, member);
                true
            }
            None => false,
        }
    }

    /// 0-based position of `member` under the requested direction.
    pub fn zrank(&self, member: &str, reverse: bool) -> Option<u32> {
        let score = *self.map.get(member)?;
        let mut rank: u32 = 0;
        let mut x: Option<u32> = None;
        for i in (0..self.level).rev() {
            loop {
                let link = self.link_at(x, i);
                let Some(nx) = link.next else { break };
                let node = &self.nodes[nx as usize];
                let advance = match node.score.total_cmp(&score) {
                    Ordering::Less => true,
                    Ordering::Greater => false,
                    Ordering::Equal => node.member.as_str() <= member,
                };
                if advance {
                    rank += link.span;
                    x = Some(nx);
                } else {
                    break;
                }
            }
            if let Some(xi) = x {
                if self.nodes[xi as usize].member == member {
                    let forward = rank - 1;
                    return Some(if reverse { self.len - 1 - forward } else { forward });
                }
            }
        }
        None
    }

    /// Count members whose score falls inside `range`.
    pub fn zcount(&self, range: ScoreRange) -> u32 {
        let lo = self.count_before(range.min, !range.min_inclusive);
        let hi = self.count_before(range.max, range.max_inclusive);
        hi.saturating_sub(lo)
    }

    /// Members at ranks `[start, stop]` (0-based, inclusive, forward
    /// order). Callers clamp the bounds; `start <= stop < len` is
    /// required here.
    pub fn range_by_rank(&self, start: u32, stop: u32) -> Vec<String> {
        let mut out = Vec::with_capacity((stop - start + 1) as usize);
        let mut idx = self.node_at(start + 1);
        let mut remaining = stop - start + 1;
        while remaining > 0 {
            let Some(i) = idx else { break };
            out.push(self.nodes[i as usize].member.clone());
            idx = self.nodes[i as usize].links[0].next;
            remaining -= 1;
        }
        out
    }

    /// Members whose score falls inside `range`, in forward order.
    pub fn range_by_score(&self, range: ScoreRange) -> Vec<String> {
        let lo = self.count_before(range.min, !range.min_inclusive);
        let hi = self.count_before(range.max, range.max_inclusive);
        if lo >= hi {
            return Vec::new();
        }
        self.range_by_rank(lo, hi - 1)
    }

    /// Remove every member whose score falls inside `range`; returns the
    /// number removed.
    pub fn zremrangebyscore(&mut self, range: ScoreRange) -> u32 {
        let doomed = self.range_by_score(range);
        let count = doomed.len() as u32;
        for member in doomed {
            self.zrem(&member);
        }
        count
    }

    /// Iterate `(member, score)` pairs in `(score, member)` order.
    pub fn iter(&self) -> IterPairs<'_> {
        IterPairs {
            zset: self,
            idx: self.head[0].next,
        }
    }

    /// Approximate heap footprint in bytes.
    pub fn memory_usage(&self) -> usize {
        let node_bytes = self.nodes.capacity() * std::mem::size_of::<Node>()
            + self
                .nodes
                .iter()
                .map(|n| n.member.capacity() + n.links.capacity() * std::mem::size_of::<Link>())
                .sum::<usize>();
        let map_bytes = self
            .map
            .keys()
            .map(|k| k.capacity() + std::mem::size_of::<f64>())
            .sum::<usize>();
        node_bytes
            + map_bytes
            + self.head.capacity() * std::mem::size_of::<Link>()
            + self.free.capacity() * std::mem::size_of::<u32>()
    }

    // =====================================================================
    // Skip-list internals
    // =====================================================================

    fn precedes(score_a: f64, member_a: &str, score_b: f64, member_b: &str) -> bool {
        match score_a.total_cmp(&score_b) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => member_a < member_b,
        }
    }

    fn link_at(&self, node: Option<u32>, level: usize) -> Link {
        match node {
            Some(i) => self.nodes[i as usize].links[level],
            None => self.head[level],
        }
    }

    fn set_link(&mut self, node: Option<u32>, level: usize, link: Link) {
        match node {
            Some(i) => self.nodes[i as usize].links[level] = link,
            None => self.head[level] = link,
        }
    }

    fn bump_span(&mut self, node: Option<u32>, level: usize, delta: i32) {
        let link = self.link_at(node, level);
        let span = (link.span as i64 + delta as i64) as u32;
        self.set_link(node, level, Link { span, ..link });
    }

    fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < MAX_LEVEL && (self.rng.gen::<u32>() & 0xFFFF) < 0xFFFF / 4 {
            level += 1;
        }
        level
    }

    fn alloc_node(&mut self, member: String, score: f64, level: usize) -> u32 {
        let links: SmallVec<[Link; 4]> = smallvec![Link::empty(); level];
        match self.free.pop() {
            Some(idx) => {
                let node = &mut self.nodes[idx as usize];
                node.member = member;
                node.score = score;
                node.prev = None;
                node.links = links;
                idx
            }
            None => {
                self.nodes.push(Node {
                    member,
                    score,
                    prev: None,
                    links,
                });
                (self.nodes.len() - 1) as u32
            }
        }
    }

    fn release_node(&mut self, idx: u32) {
        let node = &mut self.nodes[idx as usize];
        node.member = String::new();
        node.links.clear();
        node.prev = None;
        self.free.push(idx);
    }

    /// Insert a fresh `(score, member)` into the skip list. The member
    /// must not already be linked.
    fn link(&mut self, score: f64, member: String) {
        let mut update: [Option<u32>; MAX_LEVEL] = [None; MAX_LEVEL];
        let mut rank: [u32; MAX_LEVEL] = [0; MAX_LEVEL];

        let mut x: Option<u32> = None;
        for i in (0..self.level).rev() {
            rank[i] = if i == self.level - 1 { 0 } else { rank[i + 1] };
            loop {
                let link = self.link_at(x, i);
                let Some(nx) = link.next else { break };
                let node = &self.nodes[nx as usize];
                if Self::precedes(node.score, &node.member, score, &member) {
                    rank[i] += link.span;
                    x = Some(nx);
                } else {
                    break;
                }
            }
            update[i] = x;
        }

        let level = self.random_level();
        if level > self.level {
            for i in self.level..level {
                rank[i] = 0;
                update[i] = None;
                self.head.push(Link {
                    next: None,
                    span: self.len,
                });
            }
            self.level = level;
        }

        let idx = self.alloc_node(member, score, level);
        for i in 0..level {
            let up_link = self.link_at(update[i], i);
            self.set_link(
                Some(idx),
                i,
                Link {
                    next: up_link.next,
                    span: up_link.span - (rank[0] - rank[i]),
                },
            );
            self.set_link(
                update[i],
                i,
                Link {
                    next: Some(idx),
                    span: (rank[0] - rank[i]) + 1,
                },
            );
        }
        for i in level..self.level {
            self.bump_span(update[i], i, 1);
        }

        self.nodes[idx as usize].prev = update[0];
        match self.nodes[idx as usize].links[0].next {
            Some(next) => self.nodes[next as usize].prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.len += 1;
    }

    /// Unlink the node carrying exactly `(score, member)`.
    fn unlink(&mut self, score: f64, member: &str) {
        let mut update: [Option<u32>; MAX_LEVEL] = [None; MAX_LEVEL];
        let mut x: Option<u32> = None;
        for i in (0..self.level).rev() {
            loop {
                let link = self.link_at(x, i);
                let Some(nx) = link.next else { break };
                let node = &self.nodes[nx as usize];
                if Self::precedes(node.score, &node.member, score, member) {
                    x = Some(nx);
                } else {
                    break;
                }
            }
            update[i] = x;
        }

        let Some(target) = self.link_at(x, 0).next else {
            return;
        };
        {
            let node = &self.nodes[target as usize];
            if node.score.total_cmp(&score) != Ordering::Equal || node.member != member {
                return;
            }
        }

        for i in 0..self.level {
            let up_link = self.link_at(update[i], i);
            if up_link.next == Some(target) {
                let t_link = self.nodes[target as usize].links[i];
                self.set_link(
                    update[i],
                    i,
                    Link {
                        next: t_link.next,
                        span: up_link.span + t_link.span - 1,
                    },
                );
            } else {
                self.bump_span(update[i], i, -1);
            }
        }

        let t_next = self.nodes[target as usize].links[0].next;
        let t_prev = self.nodes[target as usize].prev;
        match t_next {
            Some(n) => self.nodes[n as usize].prev = t_prev,
            None => self.tail = t_prev,
        }

        while self.level > 1 && self.head[self.level - 1].next.is_none() {
            self.head.pop();
            self.level -= 1;
        }

        self.len -= 1;
        self.release_node(target);
    }

    /// Number of members ordered strictly before `bound` (`or_equal`
    /// widens that to "at or before").
    fn count_before(&self, bound: f64, or_equal: bool) -> u32 {
        let mut rank = 0u32;
        let mut x: Option<u32> = None;
        for i in (0..self.level).rev() {
            loop {
                let link = self.link_at(x, i);
                let Some(nx) = link.next else { break };
                let node = &self.nodes[nx as usize];
                let advance = if or_equal {
                    node.score <= bound
                } else {
                    node.score < bound
                };
                if advance {
                    rank += link.span;
                    x = Some(nx);
                } else {
                    break;
                }
            }
        }
        rank
    }

    /// Node at 1-based rank `target`, found by walking spans.
    fn node_at(&self, target: u32) -> Option<u32> {
        let mut traversed = 0u32;
        let mut x: Option<u32> = None;
        for i in (0..self.level).rev() {
            loop {
                let link = self.link_at(x, i);
                if link.next.is_none() || traversed + link.span > target {
                    break;
                }
                traversed += link.span;
                x = link.next;
            }
            if traversed == target {
                return x;
            }
        }
        None
    }
}

/// Ordered iterator over `(member, score)` pairs.
pub struct IterPairs<'a> {
    zset: &'a ZSet,
    idx: Option<u32>,
}

impl<'a> Iterator for IterPairs<'a> {
    type Item = (&'a str, f64);

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.idx?;
        let node = &self.zset.nodes[i as usize];
        self.idx = node.links[0].next;
        Some((&node.member, node.score))
    }
}

/// Union of weighted input sets: members present in any input, scores
/// folded with `agg`; inputs missing a member simply contribute nothing.
pub fn zunion(inputs: &[(&ZSet, f64)], agg: Aggregate) -> ZSet {
    let mut combined: FxHashMap<String, f64> = FxHashMap::default();
    for (zset, weight) in inputs {
        for (member, score) in zset.iter() {
            let weighted = score * weight;
            combined
                .entry(member.to_string())
                .and_modify(|acc| *acc = agg.apply(*acc, weighted))
                .or_insert(weighted);
        }
    }
    from_pairs(combined)
}

/// Intersection of weighted input sets: members present in every input,
/// scores folded with `agg`. An empty input list yields an empty set.
pub fn zinter(inputs: &[(&ZSet, f64)], agg: Aggregate) -> ZSet {
    let Some(((first, first_weight), rest)) = inputs.split_first() else {
        return ZSet::new();
    };
    let mut combined: FxHashMap<String, f64> = FxHashMap::default();
    'members: for (member, score) in first.iter() {
        let mut acc = score * first_weight;
        for (other, weight) in rest {
            match other.zscore(member) {
                Some(s) => acc = agg.apply(acc, s * weight),
                None => continue 'members,
            }
        }
        combined.insert(member.to_string(), acc);
    }
    from_pairs(combined)
}

fn from_pairs(pairs: FxHashMap<String, f64>) -> ZSet {
    let mut out = ZSet::new();
    for (member, score) in pairs {
        out.zadd(score, &member);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn zset_of(pairs: &[(f64, &str)]) -> ZSet {
        let mut z = ZSet::new();
        for (score, member) in pairs {
            z.zadd(*score, member);
        }
        z
    }

    fn members(z: &ZSet) -> Vec<String> {
        z.iter().map(|(m, _)| m.to_string()).collect()
    }

    #[test]
    fn test_zadd_and_zcard() {
        let z = zset_of(&[(1.0, "a"), (5.0, "e"), (2.0, "b")]);
        assert_eq!(z.zcard(), 3);
        assert!(z.zscore("a").is_some());
        assert!(z.zscore("e").is_some());
        assert!(z.zscore("b").is_some());
    }

    #[test]
    fn test_zadd_returns_new_vs_update() {
        let mut z = ZSet::new();
        assert!(z.zadd(1.0, "a"));
        assert!(!z.zadd(1.0, "a"));
        assert!(!z.zadd(9.0, "a"));
        assert_eq!(z.zcard(), 1);
        assert_eq!(z.zscore("a"), Some(9.0));
    }

    #[test]
    fn test_zadd_update_restores_ordering() {
        let mut z = zset_of(&[(1.0, "a"), (2.0, "b"), (3.0, "c")]);
        z.zadd(10.0, "a");
        assert_eq!(members(&z), vec!["b", "c", "a"]);
        assert_eq!(z.zrank("a", false), Some(2));
    }

    #[test]
    fn test_zscore_missing_member() {
        let z = zset_of(&[(1.0, "a")]);
        assert_eq!(z.zscore("a"), Some(1.0));
        assert_eq!(z.zscore("no_such_member"), None);
    }

    #[test]
    fn test_zcard_empty_and_filled() {
        let mut z = ZSet::new();
        assert_eq!(z.zcard(), 0);
        z.zadd(1.0, "a");
        z.zadd(2.0, "b");
        assert_eq!(z.zcard(), 2);
    }

    #[test]
    fn test_zcount_bounds() {
        let z = zset_of(&[(1.0, "a"), (2.0, "b"), (3.0, "c"), (4.0, "d"), (5.0, "e")]);
        assert_eq!(z.zcount(ScoreRange::inclusive(1.0, 5.0)), 5);
        assert_eq!(z.zcount(ScoreRange::new(1.0, false, 5.0, false)), 3);
        assert_eq!(z.zcount(ScoreRange::new(2.0, false, 5.0, true)), 3);
        // min > max and point-exclusive ranges are empty.
        assert_eq!(z.zcount(ScoreRange::inclusive(9.0, 1.0)), 0);
        assert_eq!(z.zcount(ScoreRange::new(3.0, false, 3.0, true)), 0);
        assert_eq!(z.zcount(ScoreRange::new(3.0, true, 3.0, false)), 0);
    }

    #[test]
    fn test_range_by_rank() {
        let z = zset_of(&[(1.0, "a"), (2.0, "b"), (3.0, "c"), (4.0, "d")]);
        assert_eq!(z.range_by_rank(1, 2), vec!["b", "c"]);
        assert_eq!(z.range_by_rank(0, 3), vec!["a", "b", "c", "d"]);
        assert_eq!(z.range_by_rank(3, 3), vec!["d"]);
    }

    #[test]
    fn test_range_by_score() {
        let z = zset_of(&[(1.0, "a"), (2.0, "b"), (3.0, "c"), (4.0, "d")]);
        assert_eq!(z.range_by_score(ScoreRange::inclusive(2.0, 3.0)), vec!["b", "c"]);
        assert_eq!(
            z.range_by_score(ScoreRange::new(1.0, false, 3.0, true)),
            vec!["b", "c"]
        );
        assert_eq!(
            z.range_by_score(ScoreRange::new(f64::NEG_INFINITY, true, f64::INFINITY, true)),
            vec!["a", "b", "c", "d"]
        );
        assert!(z.range_by_score(ScoreRange::inclusive(10.0, 20.0)).is_empty());
    }

    #[test]
    fn test_zrank_forward_and_reverse() {
        let z = zset_of(&[(1.0, "a"), (2.0, "b"), (3.0, "c")]);
        assert_eq!(z.zrank("b", false), Some(1));
        assert_eq!(z.zrank("a", false), Some(0));
        assert_eq!(z.zrank("c", false), Some(2));
        assert_eq!(z.zrank("b", true), Some(1));
        assert_eq!(z.zrank("a", true), Some(2));
        assert_eq!(z.zrank("missing", false), None);
    }

    #[test]
    fn test_score_tie_breaks_on_member() {
        let z = zset_of(&[(1.0, "bravo"), (1.0, "alpha"), (1.0, "charlie")]);
        assert_eq!(members(&z), vec!["alpha", "bravo", "charlie"]);
        assert_eq!(z.zrank("alpha", false), Some(0));
        assert_eq!(z.zrank("charlie", false), Some(2));
    }

    #[test]
    fn test_zrem() {
        let mut z = zset_of(&[(1.0, "a"), (2.0, "b"), (3.0, "c")]);
        assert!(z.zrem("b"));
        assert!(!z.zrem("b"));
        assert_eq!(z.zcard(), 2);
        assert_eq!(z.zscore("b"), None);
        assert_eq!(members(&z), vec!["a", "c"]);
    }

    #[test]
    fn test_zremrangebyscore() {
        let mut z = zset_of(&[(1.0, "a"), (2.0, "b"), (3.0, "c"), (4.0, "d")]);
        let removed = z.zremrangebyscore(ScoreRange::new(1.0, false, 3.0, false));
        assert_eq!(removed, 1);
        assert_eq!(z.zscore("b"), None);
        assert_eq!(z.zcard(), 3);
    }

    #[test]
    fn test_zinter_sum() {
        let z1 = zset_of(&[(1.0, "a"), (2.0, "b"), (3.0, "c")]);
        let z2 = zset_of(&[(3.0, "c"), (4.0, "b"), (5.0, "d")]);
        let out = zinter(&[(&z1, 1.0), (&z2, 1.0)], Aggregate::Sum);
        assert_eq!(out.zcard(), 2);
        assert_eq!(out.zscore("b"), Some(6.0));
        assert_eq!(out.zscore("c"), Some(6.0));
    }

    #[test]
    fn test_zinter_self_doubles_sum_keeps_minmax() {
        let z = zset_of(&[(1.0, "a"), (2.0, "b")]);
        let doubled = zinter(&[(&z, 1.0), (&z, 1.0)], Aggregate::Sum);
        assert_eq!(doubled.zscore("a"), Some(2.0));
        assert_eq!(doubled.zscore("b"), Some(4.0));

        let same = zinter(&[(&z, 1.0), (&z, 1.0)], Aggregate::Min);
        assert_eq!(same.zscore("a"), Some(1.0));
        assert_eq!(same.zscore("b"), Some(2.0));
    }

    #[test]
    fn test_zunion_sum() {
        let z1 = zset_of(&[(1.0, "a"), (2.0, "b")]);
        let z2 = zset_of(&[(3.0, "b"), (4.0, "c")]);
        let out = zunion(&[(&z1, 1.0), (&z2, 1.0)], Aggregate::Sum);
        assert_eq!(out.zcard(), 3);
        assert_eq!(out.zscore("a"), Some(1.0));
        assert_eq!(out.zscore("b"), Some(5.0));
        assert_eq!(out.zscore("c"), Some(4.0));
    }

    #[test]
    fn test_zunion_single_input_is_identity_modulo_weight() {
        let z = zset_of(&[(1.0, "a"), (2.0, "b")]);
        let copy = zunion(&[(&z, 1.0)], Aggregate::Sum);
        assert_eq!(copy.zscore("a"), Some(1.0));
        assert_eq!(copy.zscore("b"), Some(2.0));

        let scaled = zunion(&[(&z, 3.0)], Aggregate::Sum);
        assert_eq!(scaled.zscore("a"), Some(3.0));
        assert_eq!(scaled.zscore("b"), Some(6.0));
    }

    #[test]
    fn test_zunion_weights_and_min() {
        let z1 = zset_of(&[(2.0, "m")]);
        let z2 = zset_of(&[(10.0, "m")]);
        let out = zunion(&[(&z1, 5.0), (&z2, 1.0)], Aggregate::Min);
        assert_eq!(out.zscore("m"), Some(10.0));
        let out = zunion(&[(&z1, 5.0), (&z2, 1.0)], Aggregate::Max);
        assert_eq!(out.zscore("m"), Some(10.0));
    }

    #[test]
    fn test_zinter_empty_inputs() {
        let out = zinter(&[], Aggregate::Sum);
        assert_eq!(out.zcard(), 0);
    }

    #[test]
    fn test_aggregate_parse() {
        assert_eq!(Aggregate::parse("sum"), Some(Aggregate::Sum));
        assert_eq!(Aggregate::parse("MIN"), Some(Aggregate::Min));
        assert_eq!(Aggregate::parse("Max"), Some(Aggregate::Max));
        assert_eq!(Aggregate::parse("avg"), None);
    }

    #[test]
    fn test_memory_usage_grows() {
        let mut z = ZSet::new();
        let before = z.memory_usage();
        for i in 0..64 {
            z.zadd(i as f64, &format!("member-with-some-length-{i}"));
        }
        assert!(z.memory_usage() > before);
    }

    #[test]
    fn test_large_set_rank_consistency() {
        let mut z = ZSet::new();
        for i in 0..500u32 {
            // Insertion order deliberately scrambled.
            let v = (i * 7919) % 500;
            z.zadd(v as f64, &format!("m{v:03}"));
        }
        assert_eq!(z.zcard(), 500);
        for rank in [0u32, 1, 99, 250, 499] {
            let got = z.range_by_rank(rank, rank);
            assert_eq!(got, vec![format!("m{rank:03}")]);
            assert_eq!(z.zrank(&got[0], false), Some(rank));
        }
    }

    proptest! {
        // zrank(a) < zrank(b) iff (score(a), a) < (score(b), b).
        #[test]
        fn prop_rank_agrees_with_pair_ordering(
            pairs in proptest::collection::btree_map("[a-z]{1,6}", -100i32..100, 1..40)
        ) {
            let mut z = ZSet::new();
            for (member, score) in &pairs {
                z.zadd(*score as f64, member);
            }
            let ordered: Vec<(&str, f64)> = z.iter().collect();
            prop_assert_eq!(ordered.len(), pairs.len());

            for window in ordered.windows(2) {
                let (m1, s1) = window[0];
                let (m2, s2) = window[1];
                prop_assert!(ZSet::precedes(s1, m1, s2, m2));
                let r1 = z.zrank(m1, false);
                let r2 = z.zrank(m2, false);
                prop_assert!(r1 < r2);
            }
        }

        #[test]
        fn prop_remove_keeps_structure(
            entries in proptest::collection::vec(("[a-z]{1,4}", -50i32..50), 1..60)
        ) {
            let mut z = ZSet::new();
            let mut model: std::collections::BTreeMap<String, f64> = Default::default();
            for (member, score) in &entries {
                z.zadd(*score as f64, member);
                model.insert(member.clone(), *score as f64);
            }
            // Remove every other member.
            let victims: Vec<String> = model.keys().step_by(2).cloned().collect();
            for v in &victims {
                prop_assert!(z.zrem(v));
                model.remove(v);
            }
            prop_assert_eq!(z.zcard() as usize, model.len());
            for (member, score) in &model {
                prop_assert_eq!(z.zscore(member), Some(*score));
            }
            // Full-range extraction still sees everything, ordered.
            if !model.is_empty() {
                let all = z.range_by_rank(0, z.zcard() - 1);
                prop_assert_eq!(all.len(), model.len());
            }
        }
    }
}
