//! Enumeration of all k-cliques in a k-partite graph.

use fixedbitset::FixedBitSet;
use std::time::Instant;

struct Search<'a> {
    adjacency_matrix: &'a [FixedBitSet],
    partitions: &'a [Vec<usize>],
    deadline: Option<Instant>,
}

impl Search<'_> {
    /// Branch-and-bound over the fixed partition order. `compatible` holds
    /// the vertices adjacent to every vertex chosen so far. Returns `false`
    /// on deadline expiry.
    fn extend(
        &self,
        depth: usize,
        clique: &mut Vec<usize>,
        compatible: &FixedBitSet,
        out_cliques: &mut Vec<Vec<usize>>,
    ) -> bool {
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return false;
            }
        }

        if depth == self.partitions.len() {
            out_cliques.push(clique.clone());
            return true;
        }

        for &vertex in &self.partitions[depth] {
            if !compatible.contains(vertex) {
                continue;
            }

            let mut narrowed = compatible.clone();
            narrowed.intersect_with(&self.adjacency_matrix[vertex]);

            // Prune unless every remaining partition keeps a candidate.
            let feasible = self.partitions[depth + 1..]
                .iter()
                .all(|partition| partition.iter().any(|&other| narrowed.contains(other)));
            if !feasible {
                continue;
            }

            clique.push(vertex);
            let in_time = self.extend(depth + 1, clique, &narrowed, out_cliques);
            clique.pop();
            if !in_time {
                return false;
            }
        }

        true
    }
}

/// Finds all cliques that pick exactly one vertex from each partition, in
/// lexicographic order of the partition-wise vertex choices. Returns `false`
/// if the deadline expired; the caller must discard `out_cliques` then.
pub fn find_all_k_cliques_in_k_partite_graph(
    deadline: Option<Instant>,
    adjacency_matrix: &[FixedBitSet],
    partitions: &[Vec<usize>],
    out_cliques: &mut Vec<Vec<usize>>,
) -> bool {
    let num_vertices = adjacency_matrix.len();
    let mut compatible = FixedBitSet::with_capacity(num_vertices);
    compatible.insert_range(..);

    let search = Search {
        adjacency_matrix,
        partitions,
        deadline,
    };
    search.extend(0, &mut Vec::new(), &compatible, out_cliques)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn graph(num_vertices: usize, edges: &[(usize, usize)]) -> Vec<FixedBitSet> {
        let mut adjacency_matrix = vec![FixedBitSet::with_capacity(num_vertices); num_vertices];
        for &(u, v) in edges {
            adjacency_matrix[u].insert(v);
            adjacency_matrix[v].insert(u);
        }
        adjacency_matrix
    }

    #[test]
    fn two_partitions_are_just_edges() {
        // Partition {0, 1} and {2, 3}; edges 0-2 and 1-3.
        let adjacency_matrix = graph(4, &[(0, 2), (1, 3)]);
        let partitions = vec![vec![0, 1], vec![2, 3]];

        let mut cliques = Vec::new();
        let in_time =
            find_all_k_cliques_in_k_partite_graph(None, &adjacency_matrix, &partitions, &mut cliques);
        assert!(in_time);
        assert_eq!(cliques, vec![vec![0, 2], vec![1, 3]]);
    }

    #[test]
    fn three_partitions_require_triangles() {
        // Vertices 0, 1 | 2, 3 | 4. Only 0-2-4 forms a triangle.
        let adjacency_matrix = graph(5, &[(0, 2), (0, 4), (2, 4), (1, 3), (3, 4)]);
        let partitions = vec![vec![0, 1], vec![2, 3], vec![4]];

        let mut cliques = Vec::new();
        let in_time =
            find_all_k_cliques_in_k_partite_graph(None, &adjacency_matrix, &partitions, &mut cliques);
        assert!(in_time);
        assert_eq!(cliques, vec![vec![0, 2, 4]]);
    }

    #[test]
    fn no_edges_no_cliques() {
        let adjacency_matrix = graph(4, &[]);
        let partitions = vec![vec![0, 1], vec![2, 3]];

        let mut cliques = Vec::new();
        assert!(find_all_k_cliques_in_k_partite_graph(
            None,
            &adjacency_matrix,
            &partitions,
            &mut cliques
        ));
        assert!(cliques.is_empty());
    }

    #[test]
    fn expired_deadline_reports_failure() {
        let adjacency_matrix = graph(4, &[(0, 2), (1, 3)]);
        let partitions = vec![vec![0, 1], vec![2, 3]];

        let deadline = Instant::now() - Duration::from_millis(1);
        let mut cliques = Vec::new();
        let in_time = find_all_k_cliques_in_k_partite_graph(
            Some(deadline),
            &adjacency_matrix,
            &partitions,
            &mut cliques,
        );
        assert!(!in_time);
    }
}
