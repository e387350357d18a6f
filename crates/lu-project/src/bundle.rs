//! Merging modules into a single chunk.
//!
//! The entry chunk is prefixed with:
//!
//! ```lua
//! local __LU_REQUIRE, __LU_UNPACK, __LU_IMPORT_CACHE = require, unpack or table.unpack, {}
//! local __LU_IMPORT_TABLE = { ["mod"] = function(...) ... end }
//! require = function(input)
//!   local tryCache = __LU_IMPORT_CACHE[input]
//!   if tryCache then
//!     return __LU_UNPACK(tryCache)
//!   else
//!     local module = __LU_IMPORT_TABLE[input]
//!     if module then
//!       tryCache = { module(input) }
//!       __LU_IMPORT_CACHE[input] = tryCache
//!     else
//!       return __LU_REQUIRE(input)
//!     end
//!   end
//!   return __LU_UNPACK(tryCache)
//! end
//! ```
//!
//! Results are cached wrapped in a table so a module returning nothing is
//! still only run once. Loaders receive the require string as `...`, the
//! way `require` passes the module name to a loaded chunk.

use lu_syntax::{
    Arena, BinaryOp, Block, Chunk, ElseArm, ExprId, IfArm, Stmt, StmtKind, TableConstructor,
};

pub const ORIGINAL_REQUIRE: &str = "__LU_REQUIRE";
pub const UNPACK: &str = "__LU_UNPACK";
pub const IMPORT_CACHE: &str = "__LU_IMPORT_CACHE";
pub const IMPORT_TABLE: &str = "__LU_IMPORT_TABLE";

/// Prepend the module table and the `require` override to `entry`.
///
/// `modules` pairs each require string with the compiled module.
pub fn bundle(entry: &mut Chunk, modules: impl IntoIterator<Item = (String, Chunk)>) {
    let arena = &mut entry.arena;

    let mut table = TableConstructor::new();
    let mut count = 0;
    for (name, chunk) in modules {
        let body = arena.graft(chunk);
        let key = arena.string(name.as_str());
        let loader = arena.vararg_closure(body);
        table.push_keyed(key, loader);
        count += 1;
    }
    tracing::debug!(modules = count, "bundling modules");

    let locals = captures(arena);
    let table = arena.table(table);
    let import_table = Stmt::local(vec![IMPORT_TABLE.to_string()], vec![table], 0);
    let require = require_override(arena);
    entry.body.splice(0..0, [locals, import_table, require]);
}

/// `local __LU_REQUIRE, __LU_UNPACK, __LU_IMPORT_CACHE = require, unpack or table.unpack, {}`
fn captures(arena: &mut Arena) -> Stmt {
    let require = arena.name("require");
    let unpack = arena.name("unpack");
    let table = arena.name("table");
    let table_unpack = arena.member(table, "unpack");
    let unpack = arena.binary(BinaryOp::Or, unpack, table_unpack);
    let cache = arena.table(TableConstructor::new());
    Stmt::local(
        vec![
            ORIGINAL_REQUIRE.to_string(),
            UNPACK.to_string(),
            IMPORT_CACHE.to_string(),
        ],
        vec![require, unpack, cache],
        0,
    )
}

fn lookup(arena: &mut Arena, table: &str) -> ExprId {
    let table = arena.name(table);
    let input = arena.name("input");
    arena.subscript(table, input)
}

fn unpack_cached(arena: &mut Arena) -> Stmt {
    let unpack = arena.name(UNPACK);
    let cached = arena.name("tryCache");
    Stmt::ret(vec![arena.call(unpack, vec![cached])], 0)
}

fn if_else(condition: ExprId, body: Block, otherwise: Block) -> Stmt {
    Stmt::new(
        StmtKind::If(IfArm {
            condition,
            body,
            line: 0,
            otherwise: Some(Box::new(ElseArm::Else {
                body: otherwise,
                line: 0,
            })),
        }),
        0,
    )
}

/// `require = function(input) ... end`
fn require_override(arena: &mut Arena) -> Stmt {
    let cached = lookup(arena, IMPORT_CACHE);
    let try_cache = Stmt::local(vec!["tryCache".to_string()], vec![cached], 0);

    // tryCache = { module(input) }; __LU_IMPORT_CACHE[input] = tryCache
    let module = arena.name("module");
    let input = arena.name("input");
    let run = arena.call(module, vec![input]);
    let mut wrapper = TableConstructor::new();
    wrapper.push_positional(run);
    let wrapper = arena.table(wrapper);
    let target = arena.name("tryCache");
    let store = Stmt::assign(vec![target], vec![wrapper], 0);
    let slot = lookup(arena, IMPORT_CACHE);
    let value = arena.name("tryCache");
    let remember = Stmt::assign(vec![slot], vec![value], 0);

    let fallback = {
        let original = arena.name(ORIGINAL_REQUIRE);
        let input = arena.name("input");
        Stmt::ret(vec![arena.call(original, vec![input])], 0)
    };

    let loader = lookup(arena, IMPORT_TABLE);
    let find_module = Stmt::local(vec!["module".to_string()], vec![loader], 0);
    let has_module = arena.name("module");
    let load = if_else(has_module, vec![store, remember], vec![fallback]);

    let hit = arena.name("tryCache");
    let hit_return = unpack_cached(arena);
    let check_cache = if_else(hit, vec![hit_return], vec![find_module, load]);

    let body = vec![try_cache, check_cache, unpack_cached(arena)];
    let func = arena.closure(vec!["input".to_string()], body);
    let require = arena.name("require");
    Stmt::assign(vec![require], vec![func], 0)
}
