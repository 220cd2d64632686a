use bytes::Bytes;
use std::collections::BTreeMap;

use crate::path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Node {
    Directory,
    File(Bytes),
}

/// Content of one share, keyed by `/` joined paths without leading separator.
/// The root (empty key) always exists and is never stored.
#[derive(Debug, Default)]
pub(super) struct Tree {
    nodes: BTreeMap<String, Node>,
}

/// Share-relative key of `path`, whatever its separators.
pub(super) fn key(file_path: &str) -> String {
    file_path
        .split(path::is_separator)
        .filter(|component| !component.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

fn parent_key(key: &str) -> &str {
    key.rfind('/').map_or("", |index| &key[..index])
}

fn child_name<'a>(folder: &str, key: &'a str) -> Option<&'a str> {
    let rest = if folder.is_empty() {
        key
    } else {
        key.strip_prefix(folder)?.strip_prefix('/')?
    };
    (!rest.contains('/')).then_some(rest)
}

impl Tree {
    pub fn is_dir(&self, key: &str) -> bool {
        key.is_empty() || self.nodes.get(key) == Some(&Node::Directory)
    }

    pub fn exists(&self, key: &str) -> bool {
        key.is_empty() || self.nodes.contains_key(key)
    }

    pub fn read(&self, key: &str) -> Option<Bytes> {
        match self.nodes.get(key) {
            Some(Node::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    pub fn write(&mut self, key: &str, content: Bytes) -> Result<(), String> {
        if !self.is_dir(parent_key(key)) {
            return Err(format!("{key}: parent folder does not exist"));
        }
        if self.is_dir(key) {
            return Err(format!("{key}: is a folder"));
        }

        let _ = self.nodes.insert(key.to_owned(), Node::File(content));
        Ok(())
    }

    pub fn create_dir(&mut self, key: &str) -> Result<(), String> {
        if self.exists(key) {
            return Err(format!("{key}: already exists"));
        }
        if !self.is_dir(parent_key(key)) {
            return Err(format!("{key}: parent folder does not exist"));
        }

        let _ = self.nodes.insert(key.to_owned(), Node::Directory);
        Ok(())
    }

    pub fn create_dir_all(&mut self, key: &str) {
        let mut current = String::new();
        for component in key.split('/').filter(|c| !c.is_empty()) {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(component);

            if !self.nodes.contains_key(&current) {
                let _ = self.nodes.insert(current.clone(), Node::Directory);
            }
        }
    }

    /// Moves `old` and, for folders, everything below it.
    ///
    /// A file already at `new` is replaced, a folder is not.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), String> {
        if old.is_empty() || !self.nodes.contains_key(old) {
            return Err(format!("{old}: does not exist"));
        }
        if self.is_dir(new) {
            return Err(format!("{new}: already exists"));
        }
        if !self.is_dir(parent_key(new)) {
            return Err(format!("{new}: parent folder does not exist"));
        }
        if old == new {
            return Ok(());
        }

        let _ = self.nodes.remove(new);

        let prefix = format!("{old}/");
        let moved: Vec<String> = self
            .nodes
            .keys()
            .filter(|key| key.as_str() == old || key.starts_with(&prefix))
            .cloned()
            .collect();

        for key in moved {
            if let Some(node) = self.nodes.remove(&key) {
                let renamed = format!("{new}{}", &key[old.len()..]);
                let _ = self.nodes.insert(renamed, node);
            }
        }

        Ok(())
    }

    /// Direct children of `folder`, `None` when it is not a folder.
    pub fn children(&self, folder: &str) -> Option<Vec<(&str, &Node)>> {
        if !self.is_dir(folder) {
            return None;
        }

        Some(
            self.nodes
                .iter()
                .filter_map(|(key, node)| child_name(folder, key).map(|name| (name, node)))
                .collect(),
        )
    }
}
