//! Graphviz export of the parent/child structure.
//!
//! Built from a single flat list of people: each person links to a union node
//! for their (mother, father) pair, and each parent links into that node.
//! No traversal happens, so cyclic data renders instead of looping.

use std::collections::HashSet;

use crate::person::PersonLite;

/// Render `people` as a `digraph` in DOT syntax.
///
/// Union nodes are named `R_<mother>_<father>`, with `0` standing in for an
/// unknown parent.
pub fn family_graph_dot(people: &[PersonLite]) -> String {
  let mut lines = vec!["digraph PersonGraph {".to_owned()];
  let mut unions = HashSet::new();

  for person in people {
    let label = person.name.replace('"', "");
    lines.push(format!("    P_{} [label=\"{label}\"]", person.id));

    if person.mother_id.is_none() && person.father_id.is_none() {
      continue;
    }

    let mother = person.mother_id.unwrap_or(0);
    let father = person.father_id.unwrap_or(0);
    let union = format!("R_{mother}_{father}");

    if unions.insert(union.clone()) {
      lines.push(format!("    {union} [label=\"\" shape=point]"));
      for parent in [person.mother_id, person.father_id].into_iter().flatten() {
        lines.push(format!("    P_{parent} -> {union}"));
      }
    }
    lines.push(format!("    {union} -> P_{}", person.id));
  }

  lines.push("}".to_owned());
  let mut dot = lines.join("\n");
  dot.push('\n');
  dot
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::person::Gender;

  fn lite(id: i64, name: &str, mother_id: Option<i64>, father_id: Option<i64>) -> PersonLite {
    PersonLite { id, name: name.into(), gender: Gender::Male, mother_id, father_id }
  }

  #[test]
  fn siblings_share_one_union_node() {
    let people = vec![
      lite(1, "Mom", None, None),
      lite(2, "Dad", None, None),
      lite(3, "Kid \"K\" One", Some(1), Some(2)),
      lite(4, "Kid Two", Some(1), Some(2)),
    ];
    let dot = family_graph_dot(&people);

    assert!(dot.starts_with("digraph PersonGraph {\n"));
    assert!(dot.ends_with("}\n"));
    assert!(dot.contains("P_3 [label=\"Kid K One\"]"));
    assert_eq!(dot.matches("R_1_2 [label=\"\" shape=point]").count(), 1);
    assert_eq!(dot.matches("P_1 -> R_1_2").count(), 1);
    assert_eq!(dot.matches("P_2 -> R_1_2").count(), 1);
    assert!(dot.contains("R_1_2 -> P_3"));
    assert!(dot.contains("R_1_2 -> P_4"));
  }

  #[test]
  fn unknown_parent_is_zero() {
    let dot = family_graph_dot(&[lite(5, "Solo", Some(9), None)]);
    assert!(dot.contains("R_9_0 [label=\"\" shape=point]"));
    assert!(dot.contains("P_9 -> R_9_0"));
    assert!(!dot.contains("P_0"));
  }
}
