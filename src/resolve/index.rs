//! Project index - a syntactic [`SymbolTable`] over a set of parsed files.
//!
//! Walks each module's AST to collect:
//! - top-level items (structs, enums, traits, fns, consts, statics,
//!   type aliases)
//! - `impl` blocks and their associated items
//! - implicit tuple-struct constructors
//!
//! Resolution is purely syntactic: a path either names a top-level item
//! in the current module, a unique top-level item anywhere in the
//! project, or a `module::item` / `Type::assoc` / `module::Type::assoc`
//! chain. `use` declarations are not interpreted; the unique-name
//! fallback covers what glob imports would in a real resolver.

use std::collections::HashMap;

use ra_ap_syntax::ast::{self, HasAttrs, HasModuleItem, HasName};
use ra_ap_syntax::{AstNode, SourceFile};

use crate::resolve::{DeclId, DeclKind, Declaration, ModuleId, ProjectError, SymbolTable};
use crate::util::attrs;

struct Module {
    name: String,
    source: String,
    tree: SourceFile,
}

/// Syntactic symbol table for a set of modules (one per input file).
#[derive(Default)]
pub struct ProjectIndex {
    modules: Vec<Module>,
    decls: Vec<Declaration>,
    module_by_name: HashMap<String, ModuleId>,
    /// Top-level items: (module, name) → decl.
    top_level: HashMap<(u32, String), DeclId>,
    /// Top-level name → every decl with that name, across modules.
    global: HashMap<String, Vec<DeclId>>,
    /// Associated items: (type decl, name) → decl.
    assoc: HashMap<(DeclId, String), DeclId>,
    /// Tuple struct → its implicit constructor.
    constructors: HashMap<DeclId, DeclId>,
    /// Associated fn name → candidates, for receiver-less method lookup.
    methods_by_name: HashMap<String, Vec<DeclId>>,
}

impl ProjectIndex {
    /// Build an index from `(module name, source)` pairs.
    pub fn build<N, S>(files: &[(N, S)]) -> Result<ProjectIndex, ProjectError>
    where
        N: AsRef<str>,
        S: AsRef<str>,
    {
        if files.is_empty() {
            return Err(ProjectError::Empty);
        }

        let mut index = ProjectIndex::default();

        for (name, source) in files {
            let name = name.as_ref();
            let source = source.as_ref();
            let module = ModuleId(index.modules.len() as u32);
            if index
                .module_by_name
                .insert(name.to_string(), module)
                .is_some()
            {
                return Err(ProjectError::DuplicateModule(name.to_string()));
            }

            let parse = SourceFile::parse(source, ra_ap_syntax::Edition::Edition2021);
            for error in parse.errors() {
                tracing::warn!("parse error in `{}`: {:?}", name, error);
            }
            index.modules.push(Module {
                name: name.to_string(),
                source: source.to_string(),
                tree: parse.tree(),
            });
        }

        // Plain items first, so impl blocks can resolve their self types
        // regardless of file and module order.
        for module in 0..index.modules.len() {
            index.index_items(ModuleId(module as u32));
        }
        for module in 0..index.modules.len() {
            index.index_impls(ModuleId(module as u32));
        }

        tracing::debug!(
            "indexed {} declaration(s) across {} module(s)",
            index.decls.len(),
            index.modules.len()
        );
        Ok(index)
    }

    fn index_items(&mut self, module: ModuleId) {
        let items: Vec<ast::Item> = self.modules[module.0 as usize].tree.items().collect();
        for item in items {
            match &item {
                ast::Item::Struct(strukt) => {
                    let Some(id) = self.add_top_level(module, strukt.name(), DeclKind::Struct, &item)
                    else {
                        continue;
                    };
                    let is_tuple =
                        matches!(strukt.field_list(), Some(ast::FieldList::TupleFieldList(_)));
                    if is_tuple {
                        self.add_constructor(id);
                    }
                }
                ast::Item::Enum(e) => {
                    self.add_top_level(module, e.name(), DeclKind::Enum, &item);
                }
                ast::Item::Trait(t) => {
                    self.add_top_level(module, t.name(), DeclKind::Trait, &item);
                }
                ast::Item::TypeAlias(alias) => {
                    self.add_top_level(module, alias.name(), DeclKind::TypeAlias, &item);
                }
                ast::Item::Fn(function) => {
                    self.add_top_level(module, function.name(), DeclKind::Function, &item);
                }
                ast::Item::Const(konst) => {
                    self.add_top_level(module, konst.name(), DeclKind::Const, &item);
                }
                ast::Item::Static(statik) => {
                    self.add_top_level(module, statik.name(), DeclKind::Static, &item);
                }
                _ => {}
            }
        }
    }

    fn index_impls(&mut self, module: ModuleId) {
        let impls: Vec<ast::Impl> = self.modules[module.0 as usize]
            .tree
            .items()
            .filter_map(|item| match item {
                ast::Item::Impl(impl_block) => Some(impl_block),
                _ => None,
            })
            .collect();

        for impl_block in impls {
            let Some(container) = self.resolve_self_ty(&impl_block, module) else {
                continue;
            };
            if !self.declaration(container).kind.is_type_like() {
                continue;
            }
            let Some(assoc_items) = impl_block.assoc_item_list() else {
                continue;
            };
            for assoc_item in assoc_items.assoc_items() {
                match assoc_item {
                    ast::AssocItem::Fn(function) => {
                        self.add_assoc(module, container, function.name(), DeclKind::AssocFn, function.attrs());
                    }
                    ast::AssocItem::Const(konst) => {
                        self.add_assoc(module, container, konst.name(), DeclKind::AssocConst, konst.attrs());
                    }
                    _ => {}
                }
            }
        }
    }

    fn resolve_self_ty(&self, impl_block: &ast::Impl, module: ModuleId) -> Option<DeclId> {
        let self_ty = impl_block.self_ty()?;
        let path = match self_ty {
            ast::Type::PathType(path_type) => path_type.path()?,
            _ => return None,
        };
        self.resolve_path(&attrs::path_to_string(&path)?, module)
    }

    fn add_top_level(
        &mut self,
        module: ModuleId,
        name: Option<ast::Name>,
        kind: DeclKind,
        item: &ast::Item,
    ) -> Option<DeclId> {
        let name = name?.text().to_string();
        let id = self.push_decl(Declaration {
            qualified_name: format!("{}::{}", self.modules[module.0 as usize].name, name),
            name: name.clone(),
            kind,
            module,
            container: None,
            attrs: attrs::attrs_of(item.syntax()),
        });
        self.top_level.insert((module.0, name.clone()), id);
        self.global.entry(name).or_default().push(id);
        Some(id)
    }

    fn add_assoc(
        &mut self,
        module: ModuleId,
        container: DeclId,
        name: Option<ast::Name>,
        kind: DeclKind,
        attr_list: impl Iterator<Item = ast::Attr>,
    ) -> Option<DeclId> {
        let name = name?.text().to_string();
        let id = self.push_decl(Declaration {
            qualified_name: format!("{}::{}", self.declaration(container).qualified_name, name),
            name: name.clone(),
            kind,
            module,
            container: Some(container),
            attrs: attr_list.collect(),
        });
        self.assoc.insert((container, name.clone()), id);
        if kind == DeclKind::AssocFn {
            self.methods_by_name.entry(name).or_default().push(id);
        }
        Some(id)
    }

    fn add_constructor(&mut self, strukt: DeclId) {
        let decl = self.declaration(strukt).clone();
        let id = self.push_decl(Declaration {
            name: decl.name,
            qualified_name: decl.qualified_name,
            kind: DeclKind::Constructor,
            module: decl.module,
            container: Some(strukt),
            attrs: decl.attrs,
        });
        self.constructors.insert(strukt, id);
    }

    fn push_decl(&mut self, decl: Declaration) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        self.decls.push(decl);
        id
    }

    /// All module ids, in input order.
    pub fn modules(&self) -> impl Iterator<Item = ModuleId> {
        (0..self.modules.len() as u32).map(ModuleId)
    }

    pub fn module_named(&self, name: &str) -> Option<ModuleId> {
        self.module_by_name.get(name).copied()
    }

    pub fn module_name(&self, module: ModuleId) -> &str {
        &self.modules[module.0 as usize].name
    }

    pub fn module_source(&self, module: ModuleId) -> &str {
        &self.modules[module.0 as usize].source
    }

    pub fn module_tree(&self, module: ModuleId) -> &SourceFile {
        &self.modules[module.0 as usize].tree
    }

    /// The implicit constructor of a tuple struct.
    pub fn constructor_of(&self, strukt: DeclId) -> Option<DeclId> {
        self.constructors.get(&strukt).copied()
    }

    /// An associated fn by bare name, when the name is unambiguous
    /// across the whole project.
    pub fn method_by_name(&self, name: &str) -> Option<DeclId> {
        match self.methods_by_name.get(name).map(Vec::as_slice) {
            Some([only]) => Some(*only),
            _ => None,
        }
    }

    fn lookup_top_level(&self, module: ModuleId, name: &str) -> Option<DeclId> {
        self.top_level.get(&(module.0, name.to_string())).copied()
    }

    /// Current module first, then a unique match anywhere.
    fn lookup_simple(&self, name: &str, from: ModuleId) -> Option<DeclId> {
        if let Some(id) = self.lookup_top_level(from, name) {
            return Some(id);
        }
        match self.global.get(name).map(Vec::as_slice) {
            Some([only]) => Some(*only),
            _ => None,
        }
    }
}

impl SymbolTable for ProjectIndex {
    fn declaration(&self, id: DeclId) -> &Declaration {
        &self.decls[id.0 as usize]
    }

    fn resolve_path(&self, path: &str, from: ModuleId) -> Option<DeclId> {
        let segments: Vec<&str> = path.split("::").filter(|s| !s.is_empty()).collect();
        match segments[..] {
            [name] => self.lookup_simple(name, from),
            [first, second] => {
                if let Some(module) = self.module_named(first) {
                    self.lookup_top_level(module, second)
                } else {
                    let container = self.lookup_simple(first, from)?;
                    self.assoc.get(&(container, second.to_string())).copied()
                }
            }
            [module, type_name, member] => {
                let module = self.module_named(module)?;
                let container = self.lookup_top_level(module, type_name)?;
                self.assoc.get(&(container, member.to_string())).copied()
            }
            _ => None,
        }
    }
}
