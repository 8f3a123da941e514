use tracing::instrument;

use crate::domain::node::Node;
use crate::domain::tree::DecisionTree;

impl DecisionTree {
    /// Enumerates every root-to-leaf route, depth first, following edges in
    /// insertion order. Edges to missing nodes are skipped.
    ///
    /// The tree must be acyclic from the root: there is no cycle guard and a
    /// cyclic tree recurses without bound. Use `find_cycle` to check untrusted
    /// trees, or bounded `traverse` when only one route is needed.
    #[instrument(level = "debug", skip(self), fields(tree = %self.name()))]
    pub fn get_all_paths(&self) -> Vec<Vec<String>> {
        let mut paths = Vec::new();
        if let Some(root) = self.root() {
            let mut prefix = Vec::new();
            self.collect_paths(root, &mut prefix, &mut paths);
        }
        paths
    }

    fn collect_paths(&self, node: &Node, prefix: &mut Vec<String>, paths: &mut Vec<Vec<String>>) {
        prefix.push(node.id.clone());
        if node.is_leaf() {
            paths.push(prefix.clone());
        } else {
            for child_id in node.edges.targets() {
                if let Some(child) = self.get_node(child_id) {
                    self.collect_paths(child, prefix, paths);
                }
            }
        }
        prefix.pop();
    }
}
