//! Import alias allocation and import block rendering.
//!
//! ## Notes
//! - System package identifiers are claimed before any included module, so user aliases never
//!   shadow `fmt`, `errors` and friends.
//! - Each distinct module gets one alias for the whole run: its last path segment, or that segment
//!   plus the smallest free numeric suffix when already claimed.

use std::collections::{HashMap, HashSet};

use idlgo_core::lang::{packages, runtime};

use super::context::{GenContext, last_component};
use super::go_emitter::{GoEmitter, goln};

#[derive(Debug, Default)]
pub struct ImportResolver {
    /// Dotted module path -> alias.
    aliases: HashMap<String, String>,
    claimed: HashSet<String>,
}

impl ImportResolver {
    /// Claim the identifier a system import binds.
    pub fn claim_system(&mut self, import: &str) {
        self.claimed.insert(packages::import_identifier(import).to_string());
    }

    /// Alias for a dotted module path, allocating one on first use.
    pub fn alias_for(&mut self, module: &str) -> String {
        if let Some(alias) = self.aliases.get(module) {
            return alias.clone();
        }
        let base = last_component(module);
        let alias = if self.claimed.contains(base) {
            (1..)
                .map(|n| format!("{base}{n}"))
                .find(|candidate| !self.claimed.contains(candidate))
                .unwrap_or_else(|| format!("{base}_"))
        } else {
            base.to_string()
        };
        self.claimed.insert(alias.clone());
        self.aliases.insert(module.to_string(), alias.clone());
        alias
    }

    pub fn alias_of(&self, module: &str) -> Option<&str> {
        self.aliases.get(module).map(String::as_str)
    }
}

/// Which unit an import block is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportUnit {
    /// The types unit; enums need `database/sql/driver`.
    Types { has_enums: bool },
    Consts,
}

/// Runtime import line, always bound to the `thrift` identifier.
fn runtime_import(ctx: &GenContext<'_>) -> String {
    format!("{} \"{}\"", runtime::PACKAGE_IDENT, ctx.options.thrift_import)
}

/// Render one Go import spec line for a module path with its alias.
fn module_import(ctx: &GenContext<'_>, module: &str, alias: &str) -> String {
    let path = format!("{}{}", ctx.options.package_prefix, module.replace('.', "/"));
    if alias == last_component(module) {
        format!("\"{path}\"")
    } else {
        format!("{alias} \"{path}\"")
    }
}

/// Allocate aliases for the program's includes, skipping the local module and duplicates.
///
/// Returns `(module, alias)` pairs in include order.
pub fn resolve_includes(ctx: &mut GenContext<'_>) -> Vec<(String, String)> {
    let schema = ctx.schema;
    let local = ctx.local_module();
    let mut seen = HashSet::new();
    let mut resolved = Vec::new();
    for &included in &schema.program(ctx.program).includes {
        let module = ctx.go_module(included);
        if module == local || !seen.insert(module.clone()) {
            continue;
        }
        let alias = ctx.imports.alias_for(&module);
        resolved.push((module, alias));
    }
    resolved
}

/// Write the `import (...)` block and the unused-import protection lines of a types or consts unit.
pub fn emit_import_block(ctx: &mut GenContext<'_>, e: &mut GoEmitter, unit: ImportUnit) {
    let mut system: Vec<String> = packages::TYPES_UNIT_PACKAGES.iter().map(|p| p.to_string()).collect();
    if unit == (ImportUnit::Types { has_enums: true }) {
        system.insert(2, packages::SQL_DRIVER_PACKAGE.to_string());
    }
    system.push(runtime_import(ctx));
    for import in &system {
        ctx.imports.claim_system(import);
    }

    let includes = resolve_includes(ctx);
    let include_lines: Vec<String> = includes
        .iter()
        .map(|(module, alias)| module_import(ctx, module, alias))
        .collect();

    e.group("import", |e| {
        for import in &system {
            e.line(&quote_system(import));
        }
        if !include_lines.is_empty() {
            e.blank_line();
            for line in &include_lines {
                e.line(line);
            }
        }
    });
    e.blank_line();
    emit_unused_protection(e, &includes);
}

/// System imports are written verbatim when renamed, quoted otherwise.
fn quote_system(import: &str) -> String {
    if import.contains(' ') {
        import.to_string()
    } else {
        format!("\"{import}\"")
    }
}

fn emit_unused_protection(e: &mut GoEmitter, includes: &[(String, String)]) {
    e.line("// (needed to ensure safety because of naive import list construction.)");
    e.line("var _ = thrift.ZERO");
    e.line("var _ = fmt.Printf");
    e.line("var _ = errors.New");
    e.line("var _ = context.Background");
    e.line("var _ = time.Now");
    e.line("var _ = bytes.Equal");
    if !includes.is_empty() {
        e.blank_line();
        for (_, alias) in includes {
            goln!(e, "var _ = {alias}.{}", runtime::UNUSED_PROTECTION);
        }
    }
    e.blank_line();
}

/// Write the import block of a remote command-line unit.
///
/// Besides the system packages and includes, the remote tool imports the generated package
/// itself; its alias is returned.
pub fn emit_remote_imports(ctx: &mut GenContext<'_>, e: &mut GoEmitter) -> String {
    let mut system: Vec<String> = packages::REMOTE_UNIT_PACKAGES.iter().map(|p| p.to_string()).collect();
    system.push(runtime_import(ctx));
    for import in &system {
        ctx.imports.claim_system(import);
    }

    let includes = resolve_includes(ctx);
    let local = ctx.local_module();
    let own_alias = ctx.imports.alias_for(&local);

    let mut include_lines: Vec<String> = includes
        .iter()
        .map(|(module, alias)| module_import(ctx, module, alias))
        .collect();
    include_lines.push(module_import(ctx, &local, &own_alias));

    e.group("import", |e| {
        for import in &system {
            e.line(&quote_system(import));
        }
        e.blank_line();
        for line in &include_lines {
            e.line(line);
        }
    });
    e.blank_line();
    for (_, alias) in &includes {
        goln!(e, "var _ = {alias}.{}", runtime::UNUSED_PROTECTION);
    }
    goln!(e, "var _ = {own_alias}.{}", runtime::UNUSED_PROTECTION);
    e.blank_line();
    own_alias
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_is_last_segment() {
        let mut imports = ImportResolver::default();
        assert_eq!(imports.alias_for("acme.shared"), "shared");
        assert_eq!(imports.alias_of("acme.shared"), Some("shared"));
    }

    #[test]
    fn test_colliding_segments_get_distinct_aliases() {
        let mut imports = ImportResolver::default();
        let a = imports.alias_for("acme.common");
        let b = imports.alias_for("other.common");
        assert_eq!(a, "common");
        assert_eq!(b, "common1");
    }

    #[test]
    fn test_same_module_reuses_alias() {
        let mut imports = ImportResolver::default();
        let first = imports.alias_for("acme.common");
        imports.alias_for("other.common");
        assert_eq!(imports.alias_for("acme.common"), first);
    }

    #[test]
    fn test_system_identifiers_are_never_shadowed() {
        let mut imports = ImportResolver::default();
        imports.claim_system("fmt");
        imports.claim_system("thrift \"github.com/apache/thrift/lib/go/thrift\"");
        assert_eq!(imports.alias_for("acme.fmt"), "fmt1");
        assert_eq!(imports.alias_for("vendor.thrift"), "thrift1");
    }
}
