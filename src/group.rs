//! Widget groups.
//!
//! A group is an ordered set of members rendered one after another. Members are
//! keyed the way they were declared: positionally (`Index`) or by an explicit
//! name (`Name`) introduced through a merge.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

/// Key of a member within a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Index(usize),
    Name(String),
}

impl From<usize> for GroupKey {
    fn from(index: usize) -> Self {
        GroupKey::Index(index)
    }
}

impl From<&str> for GroupKey {
    fn from(name: &str) -> Self {
        GroupKey::Name(name.to_string())
    }
}

impl From<String> for GroupKey {
    fn from(name: String) -> Self {
        GroupKey::Name(name)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Index(index) => write!(f, "{index}"),
            GroupKey::Name(name) => f.write_str(name),
        }
    }
}

/// A widget reference inside a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Name(String),
    /// The `[name, order]` pair form. The order is kept as declared and never
    /// used to sort the group.
    Ordered { name: String, order: i64 },
}

impl Member {
    /// Widget (or group) name this member renders.
    pub fn name(&self) -> &str {
        match self {
            Member::Name(name) | Member::Ordered { name, .. } => name,
        }
    }

    /// Declared order of a `[name, order]` member.
    pub fn order(&self) -> Option<i64> {
        match self {
            Member::Name(_) => None,
            Member::Ordered { order, .. } => Some(*order),
        }
    }
}

impl From<&str> for Member {
    fn from(name: &str) -> Self {
        Member::Name(name.to_string())
    }
}

impl From<String> for Member {
    fn from(name: String) -> Self {
        Member::Name(name)
    }
}

impl From<(&str, i64)> for Member {
    fn from((name, order): (&str, i64)) -> Self {
        Member::Ordered {
            name: name.to_string(),
            order,
        }
    }
}

/// Ordered members of a group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    members: IndexMap<GroupKey, Member>,
}

impl Group {
    /// Builds a group keyed positionally from `0`.
    pub fn from_members<M: Into<Member>>(members: impl IntoIterator<Item = M>) -> Self {
        let members = members
            .into_iter()
            .enumerate()
            .map(|(index, member)| (GroupKey::Index(index), member.into()))
            .collect();
        Self { members }
    }

    /// Overlays `members` by key.
    ///
    /// An existing key is overwritten where it stands; a new key is appended.
    pub fn merge(&mut self, members: impl IntoIterator<Item = (GroupKey, Member)>) {
        for (key, member) in members {
            self.members.insert(key, member);
        }
    }

    /// Member stored under `key`.
    pub fn get(&self, key: &GroupKey) -> Option<&Member> {
        self.members.get(key)
    }

    /// Keys and members, in order.
    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &Member)> {
        self.members.iter()
    }

    /// Members without their keys, in order.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Per-member arguments for a group call.
///
/// ```
/// use serde_json::json;
/// use widget_registry::GroupArgs;
///
/// let args = GroupArgs::new().with(0usize, vec![json!("A")]).with("footer", vec![]);
/// assert_eq!(args.get(&0usize.into()), &[json!("A")]);
/// assert!(args.get(&5usize.into()).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupArgs {
    args: HashMap<GroupKey, Vec<Value>>,
}

impl GroupArgs {
    /// Creates an empty set: every member gets no arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<GroupKey>, args: Vec<Value>) -> Self {
        self.insert(key, args);
        self
    }

    /// Sets the arguments of the member under `key`.
    pub fn insert(&mut self, key: impl Into<GroupKey>, args: Vec<Value>) {
        self.args.insert(key.into(), args);
    }

    /// Arguments for the member under `key`; empty when none were given.
    pub fn get(&self, key: &GroupKey) -> &[Value] {
        self.args.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Reads a positional parameter list: `params[i]` holds the arguments of
    /// member `i`. An array is spread into the argument list, any other value
    /// is passed as the only argument.
    pub fn from_positional(params: &[Value]) -> Self {
        let args = params
            .iter()
            .enumerate()
            .map(|(index, param)| {
                let args = match param {
                    Value::Array(items) => items.clone(),
                    other => vec![other.clone()],
                };
                (GroupKey::Index(index), args)
            })
            .collect();
        Self { args }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_members_keys_positionally() {
        let group = Group::from_members(["a", "b"]);
        let keys: Vec<_> = group.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec![GroupKey::Index(0), GroupKey::Index(1)]);
    }

    #[test]
    fn test_merge_overwrites_index_in_place() {
        let mut group = Group::from_members(["a", "b"]);
        group.merge([(GroupKey::Index(1), Member::from("c"))]);

        let names: Vec<_> = group.members().map(Member::name).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_merge_appends_new_keys() {
        let mut group = Group::from_members(["a"]);
        group.merge([
            (GroupKey::from("footer"), Member::from("f")),
            (GroupKey::Index(4), Member::from("e")),
        ]);

        let names: Vec<_> = group.members().map(Member::name).collect();
        assert_eq!(names, vec!["a", "f", "e"]);
        assert_eq!(group.get(&"footer".into()), Some(&Member::from("f")));
    }

    #[test]
    fn test_merge_overwrites_named_key() {
        let mut group = Group::default();
        group.merge([(GroupKey::from("x"), Member::from("one"))]);
        group.merge([(GroupKey::from("x"), Member::from("two"))]);
        assert_eq!(group.len(), 1);
        assert_eq!(group.get(&"x".into()).map(Member::name), Some("two"));
    }

    #[test]
    fn test_ordered_member() {
        let member = Member::from(("clock", 3));
        assert_eq!(member.name(), "clock");
        assert_eq!(member.order(), Some(3));
        assert_eq!(Member::from("clock").order(), None);
    }

    #[test]
    fn test_ordered_members_keep_declaration_order() {
        let group = Group::from_members([Member::from(("late", 9)), Member::from(("early", 1))]);
        let names: Vec<_> = group.members().map(Member::name).collect();
        assert_eq!(names, vec!["late", "early"]);
    }

    #[test]
    fn test_group_args_from_positional() {
        let args = GroupArgs::from_positional(&[json!(["A", 1]), json!("B")]);
        assert_eq!(args.get(&GroupKey::Index(0)), &[json!("A"), json!(1)]);
        assert_eq!(args.get(&GroupKey::Index(1)), &[json!("B")]);
        assert!(args.get(&GroupKey::Index(2)).is_empty());
    }

    #[test]
    fn test_group_key_display() {
        assert_eq!(GroupKey::Index(2).to_string(), "2");
        assert_eq!(GroupKey::from("footer").to_string(), "footer");
    }
}
