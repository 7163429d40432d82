//! The seam between the checker and the host's name-resolution engine.
//!
//! The usage gate itself never resolves names: it consumes resolved
//! references through [`SymbolTable`], together with the read-only
//! [`Declaration`] records behind them. Production compilers implement
//! the trait on top of their own symbol tables; this crate bundles
//! [`ProjectIndex`], a purely syntactic implementation that treats every
//! input file as one module, which powers the CLI driver and the test
//! fixtures.

pub mod index;
pub mod scan;

pub use index::ProjectIndex;
pub use scan::{check_module, check_sources};

use ra_ap_syntax::ast;
use thiserror::Error;

/// Identifies one compilation module of the host build graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleId(pub u32);

/// Identifies a declaration known to the resolution engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclId(pub u32);

/// The syntactic category of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Function,
    AssocFn,
    AssocConst,
    /// The implicit callable of a tuple struct. Checked against its own
    /// annotation list only, never against its container's.
    Constructor,
    Struct,
    Enum,
    Trait,
    TypeAlias,
    Const,
    Static,
}

impl DeclKind {
    /// Container kinds whose markers spill onto their members.
    pub fn is_type_like(self) -> bool {
        matches!(self, DeclKind::Struct | DeclKind::Enum | DeclKind::Trait)
    }
}

/// A referenceable declaration, as reported by the resolution engine.
///
/// All fields are read-only views over state the engine owns; the
/// checker never mutates them.
#[derive(Debug, Clone)]
pub struct Declaration {
    /// Unqualified name as written at the declaration site.
    pub name: String,
    /// Module-qualified name; doubles as the marker identity for marker
    /// declarations.
    pub qualified_name: String,
    pub kind: DeclKind,
    pub module: ModuleId,
    /// The immediately containing declaration, if any (the self type for
    /// impl-block members, the struct for constructors).
    pub container: Option<DeclId>,
    /// Attribute list as written on the declaration.
    pub attrs: Vec<ast::Attr>,
}

/// What the checker consumes from the host's resolution engine.
///
/// Implementations only need to answer lookups; they are read
/// concurrently and must not be mutated during a check pass.
pub trait SymbolTable {
    /// The record behind a resolved reference.
    fn declaration(&self, id: DeclId) -> &Declaration;

    /// Resolve a path as written in source, from the given module.
    fn resolve_path(&self, path: &str, from: ModuleId) -> Option<DeclId>;
}

/// Errors raised while assembling a checkable project.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("duplicate module name `{0}`")]
    DuplicateModule(String),
    #[error("project has no modules")]
    Empty,
}
