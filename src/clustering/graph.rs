//! Graph helpers for turning pairwise judgments into groups.
//!
//! Pairwise "same story" judgments are not transitive, but grouping takes
//! connected components and so treats them as if they were: A~B and B~C put
//! A, B and C in one group even when A and C were judged different.

use sha2::{Digest, Sha256};

/// Undirected adjacency lists over `n` nodes.
#[derive(Debug, Clone)]
pub struct SimilarityGraph {
    adjacency: Vec<Vec<usize>>,
}

impl SimilarityGraph {
    pub fn new(nodes: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); nodes],
        }
    }

    /// Adds an undirected edge. Self-loops and out-of-range nodes are ignored.
    pub fn add_edge(&mut self, a: usize, b: usize) {
        if a == b || a >= self.adjacency.len() || b >= self.adjacency.len() {
            return;
        }
        if !self.adjacency[a].contains(&b) {
            self.adjacency[a].push(b);
            self.adjacency[b].push(a);
        }
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Connected components via iterative depth-first search.
    ///
    /// Components are ordered by their lowest node, and nodes within a
    /// component are sorted ascending, so node order is the discovery order.
    pub fn connected_components(&self) -> Vec<Vec<usize>> {
        let mut visited = vec![false; self.adjacency.len()];
        let mut components = Vec::new();

        for start in 0..self.adjacency.len() {
            if visited[start] {
                continue;
            }

            let mut component = Vec::new();
            let mut stack = vec![start];
            visited[start] = true;

            while let Some(node) = stack.pop() {
                component.push(node);
                for &next in &self.adjacency[node] {
                    if !visited[next] {
                        visited[next] = true;
                        stack.push(next);
                    }
                }
            }

            component.sort_unstable();
            components.push(component);
        }

        components
    }
}

/// Stable group identifier: hex SHA-256 over the sorted member URLs.
pub fn group_id<'a, I>(urls: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut urls: Vec<&str> = urls.into_iter().collect();
    urls.sort_unstable();

    let mut hasher = Sha256::new();
    for url in urls {
        hasher.update(url.as_bytes());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}
