//! Repo-local lint that keeps the Taskforge client hexagonal.
//!
//! Two kinds of rule are checked over every file under `client/src/{domain,
//! inbound,outbound}`:
//!
//! - Boundaries: each layer has modules and crates it may not name. The
//!   domain stays free of adapters, the terminal, and transport crates; the
//!   terminal front end never talks HTTP itself; adapters never reach back
//!   into the front end.
//! - Ownership: the persisted session belongs to `SessionManager`, so
//!   `SessionStore` may only be named next to the manager and where the
//!   binary wires the two together. `#[cfg(test)]` modules are exempt, since
//!   tests build their own managers.
//!
//! Run it with `cargo run -p architecture-lint [client-dir]`.

use std::collections::BTreeSet;
use std::fmt;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use syn::visit::Visit;

const CRATE_NAME: &str = "client";

struct Boundary {
    layer: &'static str,
    modules: &'static [&'static str],
    crates: &'static [&'static str],
}

const BOUNDARIES: [Boundary; 3] = [
    Boundary {
        layer: "domain",
        modules: &["inbound", "outbound"],
        crates: &[
            "actix_web",
            "cap_std",
            "clap",
            "color_eyre",
            "ortho_config",
            "reqwest",
            "tracing_subscriber",
        ],
    },
    Boundary {
        layer: "inbound",
        modules: &["outbound"],
        crates: &["reqwest"],
    },
    Boundary {
        layer: "outbound",
        modules: &["inbound"],
        crates: &["actix_web", "clap", "color_eyre"],
    },
];

struct Ownership {
    item: &'static str,
    owner: &'static str,
    allowed: &'static [&'static str],
}

const OWNERSHIP: [Ownership; 1] = [Ownership {
    item: "SessionStore",
    owner: "the session manager",
    allowed: &[
        "domain/mod.rs",
        "domain/session_store.rs",
        "domain/session_manager.rs",
        "inbound/cli/app.rs",
    ],
}];

/// A single rule violation discovered by the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `client/src`.
    pub file: Utf8PathBuf,
    /// Human-readable description of the violated rule.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.message)
    }
}

/// Failure modes returned by the architecture lint.
#[derive(Debug)]
pub enum ArchitectureLintError {
    /// Opening or reading the source tree failed.
    Io {
        /// Path being read when the failure happened.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// A file name was not valid UTF-8.
    NonUtf8Path {
        /// Lossy rendering of the offending name.
        name: String,
    },
    /// The file sits outside every layer or is not valid Rust.
    Parse {
        /// File path relative to `client/src`.
        file: Utf8PathBuf,
        /// Diagnostic.
        message: String,
    },
    /// One or more rules were broken.
    Violations(Vec<Violation>),
}

impl fmt::Display for ArchitectureLintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {path}: {source}"),
            Self::NonUtf8Path { name } => write!(f, "source path is not valid UTF-8: {name}"),
            Self::Parse { file, message } => write!(f, "cannot lint {file}: {message}"),
            Self::Violations(violations) => {
                writeln!(f, "{} architecture violation(s):", violations.len())?;
                violations
                    .iter()
                    .try_for_each(|violation| writeln!(f, "  {violation}"))
            }
        }
    }
}

impl std::error::Error for ArchitectureLintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `client/src`.
    pub file: Utf8PathBuf,
    /// Full file contents.
    pub contents: String,
}

/// Lint the client crate sources on disk.
///
/// `client_dir` is the crate directory, the one holding `src/`.
pub fn lint_client_sources(client_dir: &Utf8Path) -> Result<(), ArchitectureLintError> {
    let src_dir = client_dir.join("src");
    let root = Dir::open_ambient_dir(&src_dir, ambient_authority())
        .map_err(|source| ArchitectureLintError::Io { path: src_dir, source })?;
    let mut sources = Vec::new();
    for boundary in &BOUNDARIES {
        let layer = Utf8Path::new(boundary.layer);
        if root.is_dir(layer) {
            read_tree(&root, layer, &mut sources)?;
        }
    }
    sources.sort_by(|a, b| a.file.cmp(&b.file));
    lint_sources(&sources)
}

/// Lint the provided Rust sources. Intended for unit and behaviour tests.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();
    for source in sources {
        violations.extend(lint_source(source)?);
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

fn lint_source(source: &LintSource) -> Result<Vec<Violation>, ArchitectureLintError> {
    let parse_error = |message: String| ArchitectureLintError::Parse {
        file: source.file.clone(),
        message,
    };
    let layer = source.file.components().next().map(|c| c.as_str());
    let boundary = BOUNDARIES
        .iter()
        .find(|boundary| Some(boundary.layer) == layer)
        .ok_or_else(|| parse_error("not under domain/, inbound/, or outbound/".to_owned()))?;
    let parsed = syn::parse_file(&source.contents).map_err(|err| parse_error(err.to_string()))?;

    let mut usage = Usage::default();
    usage.visit_file(&parsed);

    let mut messages = BTreeSet::new();
    for path in &usage.all {
        if let Some(module) = path.crate_module().filter(|m| boundary.modules.contains(m)) {
            messages.insert(format!(
                "{} module must not depend on crate::{module}",
                boundary.layer
            ));
        }
        if let Some(name) = path.external_crate().filter(|c| boundary.crates.contains(c)) {
            messages.insert(format!(
                "{} module must not depend on external crate `{name}`",
                boundary.layer
            ));
        }
    }
    for rule in &OWNERSHIP {
        let allowed = rule.allowed.contains(&source.file.as_str());
        if !allowed && usage.production.iter().any(|path| path.names(rule.item)) {
            messages.insert(format!("only {} may use `{}`", rule.owner, rule.item));
        }
    }

    Ok(messages
        .into_iter()
        .map(|message| Violation {
            file: source.file.clone(),
            message,
        })
        .collect())
}

/// A path as written in the source, split on `::`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct UsePath(Vec<String>);

impl UsePath {
    /// The top-level module of this crate the path points into, if any.
    fn crate_module(&self) -> Option<&str> {
        let mut segments = self.0.iter().map(String::as_str).peekable();
        let first = *segments.peek()?;
        if first == CRATE_NAME {
            return segments.nth(1);
        }
        if is_relative(first) {
            return segments.find(|segment| !is_relative(segment));
        }
        BOUNDARIES
            .iter()
            .any(|boundary| boundary.layer == first)
            .then_some(first)
    }

    /// The crate a non-relative path starts from.
    fn external_crate(&self) -> Option<&str> {
        let first = self.0.first()?.as_str();
        (!is_relative(first) && first != CRATE_NAME).then_some(first)
    }

    fn names(&self, item: &str) -> bool {
        self.0.iter().any(|segment| segment == item)
    }
}

fn is_relative(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

/// Every path a file names, with the subset outside `#[cfg(test)]` modules.
#[derive(Default)]
struct Usage {
    all: BTreeSet<UsePath>,
    production: BTreeSet<UsePath>,
    test_depth: usize,
}

impl Usage {
    fn record(&mut self, segments: Vec<String>) {
        if segments.is_empty() {
            return;
        }
        let path = UsePath(segments);
        if self.test_depth == 0 {
            self.production.insert(path.clone());
        }
        self.all.insert(path);
    }
}

impl<'ast> Visit<'ast> for Usage {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        self.record(
            node.segments
                .iter()
                .map(|segment| segment.ident.to_string())
                .collect(),
        );
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        let mut flattened = Vec::new();
        flatten_use(&node.tree, &[], &mut flattened);
        for segments in flattened {
            self.record(segments);
        }
    }

    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        let test_only = usize::from(node.attrs.iter().any(is_cfg_test));
        self.test_depth += test_only;
        syn::visit::visit_item_mod(self, node);
        self.test_depth -= test_only;
    }
}

fn is_cfg_test(attr: &syn::Attribute) -> bool {
    match &attr.meta {
        syn::Meta::List(list) => list.path.is_ident("cfg") && list.tokens.to_string() == "test",
        _ => false,
    }
}

/// Expand `use a::{b, c::*}` into `a::b` and `a::c::*`.
fn flatten_use(tree: &syn::UseTree, prefix: &[String], out: &mut Vec<Vec<String>>) {
    let extend = |segment: String| {
        let mut path = prefix.to_vec();
        path.push(segment);
        path
    };
    match tree {
        syn::UseTree::Path(path) => flatten_use(&path.tree, &extend(path.ident.to_string()), out),
        syn::UseTree::Name(name) => out.push(extend(name.ident.to_string())),
        syn::UseTree::Rename(rename) => out.push(extend(rename.ident.to_string())),
        syn::UseTree::Glob(_) => out.push(extend("*".to_owned())),
        syn::UseTree::Group(group) => {
            for item in &group.items {
                flatten_use(item, prefix, out);
            }
        }
    }
}

fn read_tree(
    dir: &Dir,
    relative: &Utf8Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    let io_error = |path: &Utf8Path| {
        let path = path.to_path_buf();
        move |source| ArchitectureLintError::Io { path, source }
    };
    let layer_dir = dir.open_dir(relative).map_err(io_error(relative))?;
    for entry in layer_dir.entries().map_err(io_error(relative))? {
        let entry = entry.map_err(io_error(relative))?;
        let os_name = entry.file_name();
        let name = os_name.to_str().ok_or_else(|| ArchitectureLintError::NonUtf8Path {
            name: os_name.to_string_lossy().into_owned(),
        })?;
        let path = relative.join(name);
        if entry.file_type().map_err(io_error(&path))?.is_dir() {
            read_tree(dir, &path, sources)?;
        } else if path.extension() == Some("rs") {
            let contents = dir.read_to_string(&path).map_err(io_error(&path))?;
            sources.push(LintSource {
                file: path,
                contents,
            });
        }
    }
    Ok(())
}
