//! Document-wide literal substitution.
//!
//! A `template_all` directive declares the example literals the reference
//! source uses. Each variant pairs those canonicals with its own
//! `example_values` and the resulting mapping applies to every subsequent
//! output line of the document — the scope is the whole document pass, not
//! the directive block that declared the literals.
//!
//! Canonical literals are assumed not to overlap each other as textual
//! patterns beyond the guarantee documented on [`LiteralMap::apply`]:
//! matches are located against the original line, so a shorter canonical
//! inside a longer one cannot corrupt the longer one's replacement.

#[derive(Debug, Clone, Default)]
pub struct LiteralMap {
    /// Ordered canonical → destination pairs. Declaration order matters for
    /// tie-breaking when match spans share a start offset.
    entries: Vec<(String, String)>,
}

impl LiteralMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pairs `canonicals` in declaration order with `example_values`,
    /// cycling the examples when there are more canonicals than examples.
    /// A variant with no example values registers nothing. Re-registering a
    /// canonical overwrites its destination in place.
    pub fn register(&mut self, canonicals: &[String], example_values: &[String]) {
        if example_values.is_empty() {
            return;
        }
        for (i, canonical) in canonicals.iter().enumerate() {
            let destination = &example_values[i % example_values.len()];
            match self.entries.iter_mut().find(|(c, _)| c == canonical) {
                Some(entry) => entry.1 = destination.clone(),
                None => self.entries.push((canonical.clone(), destination.clone())),
            }
        }
    }

    /// Applies the mapping to one line.
    ///
    /// Match spans are collected against the original text — left to right,
    /// non-overlapping per canonical — and then spliced in descending
    /// start-offset order (stable for ties), so a replacement never shifts
    /// a span that was already located. Every occurrence of a canonical
    /// maps to the same destination; there is no positional disambiguation.
    pub fn apply(&self, line: &str) -> String {
        let mut spans: Vec<(usize, usize, &str)> = Vec::new();
        for (canonical, destination) in &self.entries {
            let mut from = 0;
            while let Some(offset) = line[from..].find(canonical.as_str()) {
                let start = from + offset;
                spans.push((start, start + canonical.len(), destination));
                from = start + canonical.len();
            }
        }
        if spans.is_empty() {
            return line.to_string();
        }
        spans.sort_by_key(|&(start, _, _)| std::cmp::Reverse(start));
        let mut out = line.to_string();
        for (start, end, destination) in spans {
            out.replace_range(start..end, destination);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cyclic_mapping_wraps_examples() {
        let mut map = LiteralMap::new();
        map.register(&strings(&["A", "B", "C", "D"]), &strings(&["x", "y"]));
        assert_eq!(map.apply("A B C D"), "x y x y");
    }

    #[test]
    fn test_every_occurrence_replaced_including_same_line() {
        let mut map = LiteralMap::new();
        map.register(&strings(&["505"]), &strings(&["505L"]));
        assert_eq!(
            map.apply("assertEquals(505, m.get(505));"),
            "assertEquals(505L, m.get(505L));"
        );
    }

    #[test]
    fn test_overlap_safety() {
        let mut map = LiteralMap::new();
        map.register(&strings(&["5", "55"]), &strings(&["9", "99"]));
        assert_eq!(map.apply("55"), "99");
        assert_eq!(map.apply("5"), "9");
        assert_eq!(map.apply("x 55 y 5"), "x 99 y 9");
    }

    #[test]
    fn test_no_example_values_registers_nothing() {
        let mut map = LiteralMap::new();
        map.register(&strings(&["505"]), &[]);
        assert!(map.is_empty());
        assert_eq!(map.apply("505"), "505");
    }

    #[test]
    fn test_reregistering_overwrites_destination() {
        let mut map = LiteralMap::new();
        map.register(&strings(&["505"]), &strings(&["first"]));
        map.register(&strings(&["505"]), &strings(&["second"]));
        assert_eq!(map.apply("505"), "second");
    }

    #[test]
    fn test_identity_mapping_is_noop() {
        let mut map = LiteralMap::new();
        map.register(&strings(&["5", "55"]), &strings(&["5", "55"]));
        assert_eq!(map.apply("55 5 555"), "55 5 555");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn empty_map_is_identity(line in ".{0,80}") {
                let map = LiteralMap::new();
                prop_assert_eq!(map.apply(&line), line);
            }

            #[test]
            fn cyclic_index_law(n in 1usize..16, examples in proptest::collection::vec("[a-z]{1,6}", 1..5)) {
                // Fixed-width canonical tokens cannot overlap one another.
                let canonicals: Vec<String> = (0..n).map(|i| format!("lit{:03}", i)).collect();
                let mut map = LiteralMap::new();
                map.register(&canonicals, &examples);

                let line = canonicals.join(" ");
                let expected: Vec<&str> = (0..n).map(|i| examples[i % examples.len()].as_str()).collect();
                prop_assert_eq!(map.apply(&line), expected.join(" "));
            }
        }
    }
}
