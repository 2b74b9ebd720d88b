//! Module boundary lint for the Shopdesk client.
//!
//! Every file under `client/src/<layer>/` is parsed and each path it names,
//! whether in a `use` tree, an expression, a type, or a macro invocation, is
//! resolved to either a crate-internal module root or an external crate. The
//! [`LAYERS`] table says which of those each layer may not reach.
//!
//! Files outside a listed layer (`app.rs`, `config.rs`, `main.rs`) are the
//! composition root and are not scanned.
//!
//! Run it with `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use syn::visit::{self, Visit};

/// Library name of the linted crate, as used in absolute paths.
const CRATE_NAME: &str = "shopdesk";

/// Boundary rule for one top-level module of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layer {
    /// Directory under `client/src`, also the module name.
    pub dir: &'static str,
    /// Crate-internal module roots the layer may not name.
    pub forbidden_modules: &'static [&'static str],
    /// External crates the layer may not name.
    pub forbidden_crates: &'static [&'static str],
}

/// The client's layers. `domain` holds stores and ports, `inbound` drives
/// them from the command line, and `outbound` implements the ports over HTTP.
pub const LAYERS: &[Layer] = &[
    Layer {
        dir: "domain",
        forbidden_modules: &["app", "config", "inbound", "outbound"],
        forbidden_crates: &[
            "clap",
            "color_eyre",
            "ortho_config",
            "reqwest",
            "tracing_subscriber",
        ],
    },
    Layer {
        dir: "inbound",
        forbidden_modules: &["outbound"],
        forbidden_crates: &["reqwest"],
    },
    Layer {
        dir: "outbound",
        forbidden_modules: &["app", "inbound"],
        forbidden_crates: &["clap", "ortho_config"],
    },
];

impl Layer {
    /// The layer owning `file`, a path relative to `client/src`.
    pub fn of(file: &Path) -> Option<&'static Self> {
        let first = file.components().next()?.as_os_str().to_str()?;
        LAYERS.iter().find(|layer| layer.dir == first)
    }

    fn forbids(&self, dependency: &Dependency) -> bool {
        match dependency {
            Dependency::Module(root) => self.forbidden_modules.contains(&root.as_str()),
            Dependency::Crate(root) => self.forbidden_crates.contains(&root.as_str()),
        }
    }
}

/// What a path resolves to, by its root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dependency {
    /// A top-level module of the client itself.
    Module(String),
    /// Another crate.
    Crate(String),
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module(root) => write!(f, "crate::{root}"),
            Self::Crate(root) => write!(f, "external crate `{root}`"),
        }
    }
}

/// A forbidden dependency found in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `client/src`.
    pub file: PathBuf,
    /// Layer the file belongs to.
    pub layer: &'static str,
    /// What the file reached for.
    pub dependency: Dependency,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} module must not depend on {}",
            self.file.display(),
            self.layer,
            self.dependency
        )
    }
}

/// Why a lint run did not pass.
#[derive(Debug, thiserror::Error)]
pub enum ArchitectureLintError {
    /// A directory or file could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
    /// A source was handed to the lint that sits outside every layer.
    #[error("{} is not under any of the linted layers", .file.display())]
    Unlayered {
        /// Offending path.
        file: PathBuf,
    },
    /// A source is not valid Rust.
    #[error("cannot parse {}: {message}", .file.display())]
    Parse {
        /// Offending path.
        file: PathBuf,
        /// Parser diagnostic.
        message: String,
    },
    /// One or more boundary violations were found.
    #[error("architecture boundary violations:{}", list(.0))]
    Violations(Vec<Violation>),
}

fn list(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| format!("\n- {violation}"))
        .collect()
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `client/src`.
    pub file: PathBuf,
    /// Rust source text.
    pub contents: String,
}

/// Lint the client crate sources on disk.
///
/// `client_dir` is the `client/` directory at the repository root. Layer
/// directories that do not exist are skipped.
pub fn lint_client_sources(client_dir: &Path) -> Result<(), ArchitectureLintError> {
    let src = client_dir.join("src");
    let mut sources = Vec::new();
    for layer in LAYERS {
        let dir = src.join(layer.dir);
        if dir.is_dir() {
            read_sources(&src, &dir, &mut sources)?;
        }
    }
    lint_sources(&sources)
}

/// Lint the provided Rust sources, reporting every violation at once.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();
    for source in sources {
        let layer = Layer::of(&source.file).ok_or_else(|| ArchitectureLintError::Unlayered {
            file: source.file.clone(),
        })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;

        let mut scan = BoundaryScan::new(layer);
        scan.visit_file(&parsed);
        violations.extend(scan.found.into_iter().map(|dependency| Violation {
            file: source.file.clone(),
            layer: layer.dir,
            dependency,
        }));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

/// Resolve a path by its leading segments.
///
/// `crate::`, `self::`, `super::` and `shopdesk::` prefixes lead to a module
/// root; a bare layer name does too. Anything else is treated as a crate.
fn resolve<'a>(segments: impl IntoIterator<Item = &'a str>) -> Option<Dependency> {
    let mut segments = segments.into_iter();
    let first = segments.next()?;
    let module = |root: &str| Dependency::Module(root.to_owned());
    match first {
        "crate" | "self" | "super" => segments
            .find(|segment| !matches!(*segment, "self" | "super"))
            .map(module),
        CRATE_NAME => segments.next().map(module),
        _ if LAYERS.iter().any(|layer| layer.dir == first) => Some(module(first)),
        _ => Some(Dependency::Crate(first.to_owned())),
    }
}

/// Visitor collecting the forbidden dependencies of one file.
struct BoundaryScan {
    layer: &'static Layer,
    found: BTreeSet<Dependency>,
}

impl BoundaryScan {
    const fn new(layer: &'static Layer) -> Self {
        Self {
            layer,
            found: BTreeSet::new(),
        }
    }

    fn check(&mut self, dependency: Option<Dependency>) {
        if let Some(dependency) = dependency.filter(|found| self.layer.forbids(found)) {
            self.found.insert(dependency);
        }
    }

    /// Walk a `use` tree, keeping the segments above the current node in
    /// `prefix`.
    fn walk_use(&mut self, tree: &syn::UseTree, prefix: &mut Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.walk_use(&path.tree, prefix);
                prefix.pop();
            }
            syn::UseTree::Name(syn::UseName { ident, .. })
            | syn::UseTree::Rename(syn::UseRename { ident, .. }) => {
                let leaf = ident.to_string();
                let segments = prefix.iter().map(String::as_str).chain([leaf.as_str()]);
                self.check(resolve(segments));
            }
            syn::UseTree::Glob(_) => {
                self.check(resolve(prefix.iter().map(String::as_str)));
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.walk_use(item, prefix);
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for BoundaryScan {
    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.walk_use(&node.tree, &mut Vec::new());
    }

    fn visit_item_extern_crate(&mut self, node: &'ast syn::ItemExternCrate) {
        self.check(Some(Dependency::Crate(node.ident.to_string())));
    }

    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<String> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        // A lone identifier is a local name, not a dependency.
        if segments.len() > 1 {
            self.check(resolve(segments.iter().map(String::as_str)));
        }
        visit::visit_path(self, node);
    }
}

fn read_sources(
    src: &Path,
    dir: &Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    let mut entries = fs::read_dir(dir)
        .map_err(io_error(dir))?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_error(dir))?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            read_sources(src, &path, sources)?;
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            let contents = fs::read_to_string(&path).map_err(io_error(&path))?;
            let file = path.strip_prefix(src).unwrap_or(&path).to_path_buf();
            sources.push(LintSource { file, contents });
        }
    }
    Ok(())
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> ArchitectureLintError + use<> {
    let path = path.to_path_buf();
    move |source| ArchitectureLintError::Io { path, source }
}
