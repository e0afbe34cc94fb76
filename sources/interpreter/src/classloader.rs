use std::{collections::HashMap, fs, path::Path};

use parse::{classfile::ClassFile, error::ParseError, formatcheck::format_check, parser::Parser};
use thiserror::Error;
use tracing::{debug, error};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A named registry of parsed classes. Loaders form a parent chain
/// (recorded by name); parent-first delegation on lookup is a future
/// direction, for now each loader answers only for the classes it loaded.
#[derive(Debug)]
pub struct ClassLoader {
    pub name: String,
    pub parent: String,
    classes: HashMap<String, ClassFile>,
}

impl ClassLoader {
    fn new(name: &str, parent: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: parent.to_string(),
            classes: HashMap::new(),
        }
    }

    /// Read, parse, format-check and install one class file. The class is
    /// keyed by the name parsed out of the file, not by the path; the
    /// installed name is returned so callers can look the class up.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<String, LoadError> {
        let path = path.as_ref();

        let bytes = fs::read(path).map_err(|e| {
            error!("could not read file: {}", path.display());
            e
        })?;
        debug!("{} read", path.display());

        let class = Parser::new(&bytes).parse().map_err(|e| {
            error!("error parsing {}", path.display());
            e
        })?;
        format_check(&class)?;

        let class_name = class.class_name.clone();
        self.insert(class);
        Ok(class_name)
    }

    /// Install a parsed class under its own name. Loading the same class
    /// twice is a no-op; the first definition wins.
    pub fn insert(&mut self, class: ClassFile) {
        self.classes.entry(class.class_name.clone()).or_insert(class);
    }

    pub fn lookup(&self, class_name: &str) -> Option<&ClassFile> {
        self.classes.get(class_name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// The three process-wide loaders, wired bootstrap -> extension -> app.
#[derive(Debug)]
pub struct Loaders {
    pub bootstrap: ClassLoader,
    pub extension: ClassLoader,
    pub application: ClassLoader,
}

impl Loaders {
    pub fn init() -> Self {
        Self {
            bootstrap: ClassLoader::new("bootstrap", ""),
            extension: ClassLoader::new("extension", "bootstrap"),
            // the application loader reports "system" as its parent for
            // compatibility with the platform naming
            application: ClassLoader::new("app", "system"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Assemble a minimal, well-formed class file in memory:
    /// `public class <name> extends java/lang/Object` with no interfaces,
    /// fields, methods or attributes.
    fn tiny_class(name: &str) -> Vec<u8> {
        let object = b"java/lang/Object";

        let mut bytes: Vec<u8> = vec![0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00, 0x00, 0x37];
        bytes.extend_from_slice(&5u16.to_be_bytes()); // constant pool count

        // 1: Utf8 <name>
        bytes.push(1);
        bytes.extend_from_slice(&(name.len() as u16).to_be_bytes());
        bytes.extend_from_slice(name.as_bytes());
        // 2: Class -> 1
        bytes.push(7);
        bytes.extend_from_slice(&1u16.to_be_bytes());
        // 3: Utf8 java/lang/Object
        bytes.push(1);
        bytes.extend_from_slice(&(object.len() as u16).to_be_bytes());
        bytes.extend_from_slice(object);
        // 4: Class -> 3
        bytes.push(7);
        bytes.extend_from_slice(&3u16.to_be_bytes());

        bytes.extend_from_slice(&0x21u16.to_be_bytes()); // access flags
        bytes.extend_from_slice(&2u16.to_be_bytes()); // this
        bytes.extend_from_slice(&4u16.to_be_bytes()); // super
        bytes.extend_from_slice(&0u16.to_be_bytes()); // interfaces
        bytes.extend_from_slice(&0u16.to_be_bytes()); // fields
        bytes.extend_from_slice(&0u16.to_be_bytes()); // methods
        bytes.extend_from_slice(&0u16.to_be_bytes()); // attributes

        bytes
    }

    #[test]
    fn it_wires_the_loader_hierarchy() {
        let loaders = Loaders::init();

        assert_eq!(loaders.bootstrap.name, "bootstrap");
        assert_eq!(loaders.bootstrap.parent, "");
        assert_eq!(loaders.extension.name, "extension");
        assert_eq!(loaders.extension.parent, "bootstrap");
        assert_eq!(loaders.application.name, "app");
        assert_eq!(loaders.application.parent, "system");

        assert!(loaders.bootstrap.is_empty());
        assert!(loaders.extension.is_empty());
        assert!(loaders.application.is_empty());
    }

    #[test]
    fn it_loads_a_class_from_a_file() {
        let path = std::env::temp_dir().join("arabica-loader-test.class");
        fs::write(&path, tiny_class("Tiny")).unwrap();

        let mut loaders = Loaders::init();
        let name = loaders.application.load_from_file(&path).unwrap();
        assert_eq!(name, "Tiny");

        let class = loaders.application.lookup("Tiny").unwrap();
        assert_eq!(class.super_class_name, "java/lang/Object");

        fs::remove_file(&path).ok();
    }

    #[test]
    fn it_surfaces_io_errors() {
        let mut loaders = Loaders::init();
        let err = loaders
            .application
            .load_from_file("/definitely/not/here.class")
            .unwrap_err();

        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn it_inserts_idempotently() {
        let first = Parser::new(&tiny_class("Dup")).parse().unwrap();
        let second = Parser::new(&tiny_class("Dup")).parse().unwrap();

        let mut loaders = Loaders::init();
        loaders.application.insert(first);
        loaders.application.insert(second);

        assert_eq!(loaders.application.len(), 1);
        assert!(loaders.application.lookup("Dup").is_some());
    }
}
