//! CFG data structure and builder: HLIR → CFG translation (spec.md §4.2, §4.3).

use crate::error::{CfgError, Result};
use slang_hir::{CompilationUnit, Expr, FunctionDecl, Literal, Stmt};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::debug;

/// Unique identifier for a basic block, stable for the lifetime of one CFG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub usize);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}", self.0)
    }
}

/// How a basic block transfers control to its successors. Carried alongside
/// `successors` purely for diagnostic rendering — the graph shape is the
/// sole source of truth for analyses.
#[derive(Debug, Clone, PartialEq)]
pub enum Terminator {
    Goto(BlockId),
    Branch {
        cond: Expr,
        then_block: BlockId,
        else_block: BlockId,
    },
    Return(Option<Expr>),
    Loop {
        cond: Expr,
        body_block: BlockId,
        exit_block: BlockId,
    },
    Unreachable,
}

/// A basic block: a maximal straight-line run of HLIR statements with a
/// single entry and single exit control-flow-wise (spec.md §3.2).
#[derive(Debug, Clone, PartialEq)]
pub struct BasicBlock {
    pub id: BlockId,
    pub stmts: Vec<Stmt>,
    pub terminator: Option<Terminator>,
    pub successors: BTreeSet<BlockId>,
    pub predecessors: BTreeSet<BlockId>,
}

impl BasicBlock {
    fn new(id: BlockId) -> Self {
        Self {
            id,
            stmts: Vec::new(),
            terminator: None,
            successors: BTreeSet::new(),
            predecessors: BTreeSet::new(),
        }
    }
}

/// A built, immutable control-flow graph. `entry` has no predecessors;
/// `exit` has no successors; every block but `exit` is reachable from
/// `entry` (an unreachable `exit` marks a function that provably never
/// returns, e.g. an unconditional loop with no `break`).
#[derive(Debug, Clone, PartialEq)]
pub struct Cfg {
    blocks: BTreeMap<BlockId, BasicBlock>,
    pub entry: BlockId,
    pub exit: BlockId,
}

impl Cfg {
    pub fn entry(&self) -> BlockId {
        self.entry
    }

    pub fn exit(&self) -> BlockId {
        self.exit
    }

    pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.get(&id)
    }

    /// All block ids, ascending (spec.md §4.3: "stable order: id-ascending").
    pub fn block_ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.blocks.keys().copied()
    }

    pub fn blocks(&self) -> impl Iterator<Item = &BasicBlock> {
        self.blocks.values()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn check_invariants(&self) -> Result<()> {
        let entry_block = self
            .blocks
            .get(&self.entry)
            .ok_or_else(|| CfgError::InvariantViolation("entry block missing".to_string()))?;
        if !entry_block.predecessors.is_empty() {
            return Err(CfgError::InvariantViolation(
                "entry block has predecessors".to_string(),
            ));
        }
        let exit_block = self
            .blocks
            .get(&self.exit)
            .ok_or_else(|| CfgError::InvariantViolation("exit block missing".to_string()))?;
        if !exit_block.successors.is_empty() {
            return Err(CfgError::InvariantViolation(
                "exit block has successors".to_string(),
            ));
        }

        for (&id, block) in &self.blocks {
            for &succ in &block.successors {
                let succ_block = self.blocks.get(&succ).ok_or_else(|| {
                    CfgError::InvariantViolation(format!("block {id} has dangling successor {succ}"))
                })?;
                if !succ_block.predecessors.contains(&id) {
                    return Err(CfgError::InvariantViolation(format!(
                        "successor {succ} of block {id} does not list it as a predecessor"
                    )));
                }
            }
            for &pred in &block.predecessors {
                let pred_block = self.blocks.get(&pred).ok_or_else(|| {
                    CfgError::InvariantViolation(format!("block {id} has dangling predecessor {pred}"))
                })?;
                if !pred_block.successors.contains(&id) {
                    return Err(CfgError::InvariantViolation(format!(
                        "predecessor {pred} of block {id} does not list it as a successor"
                    )));
                }
            }
        }

        let reachable = reachable_from(&self.blocks, self.entry);
        for &id in self.blocks.keys() {
            if id != self.exit && !reachable.contains(&id) {
                return Err(CfgError::InvariantViolation(format!(
                    "block {id} is not reachable from entry"
                )));
            }
        }
        Ok(())
    }
}

fn reachable_from(blocks: &BTreeMap<BlockId, BasicBlock>, start: BlockId) -> BTreeSet<BlockId> {
    let mut seen = BTreeSet::new();
    let mut stack = vec![start];
    while let Some(id) = stack.pop() {
        if seen.insert(id) {
            if let Some(block) = blocks.get(&id) {
                stack.extend(block.successors.iter().copied());
            }
        }
    }
    seen
}

struct LoopContext {
    continue_target: BlockId,
    break_target: BlockId,
}

/// Translates a compilation unit or a single function body into a `Cfg`.
/// Maintains a monotonically increasing block-id counter, the currently
/// open block statements are appended to, and a stack of loop targets for
/// `break`/`continue` resolution (spec.md §4.2).
pub struct CfgBuilder {
    blocks: BTreeMap<BlockId, BasicBlock>,
    next_id: usize,
    current: BlockId,
    entry: BlockId,
    exit: BlockId,
    loop_stack: Vec<LoopContext>,
}

impl CfgBuilder {
    fn new() -> Self {
        let entry = BlockId(0);
        let exit = BlockId(1);
        let mut blocks = BTreeMap::new();
        blocks.insert(entry, BasicBlock::new(entry));
        blocks.insert(exit, BasicBlock::new(exit));
        Self {
            blocks,
            next_id: 2,
            current: entry,
            entry,
            exit,
            loop_stack: Vec::new(),
        }
    }

    /// Build the CFG of a compilation unit's top-level statements. Nested
    /// `Function`/`Struct` declarations are not inlined; build their bodies
    /// separately with `build_function`.
    pub fn build_unit(unit: &CompilationUnit) -> Result<Cfg> {
        let mut builder = Self::new();
        builder.build_stmts(&unit.stmts)?;
        builder.finish()
    }

    /// Build the CFG of a single function body. A method's `receiver` is an
    /// implicit leading parameter in name only (see `FunctionDecl::receiver`)
    /// and, like every other parameter, is not modeled as a definition at
    /// entry — it flows through analyses as a plain free name.
    pub fn build_function(func: &FunctionDecl) -> Result<Cfg> {
        let mut builder = Self::new();
        builder.build_stmts(&func.body)?;
        builder.finish()
    }

    fn new_block(&mut self) -> BlockId {
        let id = BlockId(self.next_id);
        self.next_id += 1;
        self.blocks.insert(id, BasicBlock::new(id));
        id
    }

    fn add_edge(&mut self, from: BlockId, to: BlockId) {
        if let Some(block) = self.blocks.get_mut(&from) {
            block.successors.insert(to);
        }
        if let Some(block) = self.blocks.get_mut(&to) {
            block.predecessors.insert(from);
        }
    }

    fn set_terminator(&mut self, block: BlockId, terminator: Terminator) {
        if let Some(block) = self.blocks.get_mut(&block) {
            block.terminator = Some(terminator);
        }
    }

    fn is_open(&self, block: BlockId) -> bool {
        self.blocks.get(&block).is_some_and(|b| b.terminator.is_none())
    }

    fn close_with_goto(&mut self, block: BlockId, target: BlockId) {
        if self.is_open(block) {
            self.set_terminator(block, Terminator::Goto(target));
            self.add_edge(block, target);
        }
    }

    fn push_stmt(&mut self, stmt: Stmt) {
        if let Some(block) = self.blocks.get_mut(&self.current) {
            block.stmts.push(stmt);
        }
    }

    fn build_stmts(&mut self, stmts: &[Stmt]) -> Result<()> {
        for stmt in stmts {
            self.build_stmt(stmt)?;
        }
        Ok(())
    }

    fn build_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::Let { .. } | Stmt::Assign { .. } | Stmt::ExprStmt(_) | Stmt::Print(_) | Stmt::DerefAssign { .. } => {
                self.push_stmt(stmt.clone());
                Ok(())
            }
            Stmt::Return(expr) => {
                self.push_stmt(stmt.clone());
                self.set_terminator(self.current, Terminator::Return(expr.clone()));
                self.add_edge(self.current, self.exit);
                self.current = self.new_block();
                Ok(())
            }
            Stmt::If { cond, then_block, else_block } => {
                self.build_if(cond, then_block, else_block.as_deref())
            }
            Stmt::While { cond, body } => self.build_while(cond, body),
            Stmt::Break { span } => {
                let Some(ctx) = self.loop_stack.last() else {
                    return Err(CfgError::BreakOutsideLoop(*span));
                };
                let target = ctx.break_target;
                self.set_terminator(self.current, Terminator::Goto(target));
                self.add_edge(self.current, target);
                self.current = self.new_block();
                Ok(())
            }
            Stmt::Continue { span } => {
                let Some(ctx) = self.loop_stack.last() else {
                    return Err(CfgError::ContinueOutsideLoop(*span));
                };
                let target = ctx.continue_target;
                self.set_terminator(self.current, Terminator::Goto(target));
                self.add_edge(self.current, target);
                self.current = self.new_block();
                Ok(())
            }
            Stmt::Function(decl) => {
                debug!(name = %decl.name, "eliding nested function declaration from enclosing CFG");
                Ok(())
            }
            Stmt::Struct(decl) => {
                debug!(id = %decl.id, "eliding struct declaration from enclosing CFG");
                Ok(())
            }
            Stmt::Block(inner) => self.build_stmts(inner),
        }
    }

    fn build_if(&mut self, cond: &Expr, then_block: &[Stmt], else_block: Option<&[Stmt]>) -> Result<()> {
        self.push_stmt(Stmt::ExprStmt(cond.clone()));
        let then_entry = self.new_block();
        let else_entry = self.new_block();
        let branch_block = self.current;
        self.set_terminator(
            branch_block,
            Terminator::Branch {
                cond: cond.clone(),
                then_block: then_entry,
                else_block: else_entry,
            },
        );
        self.add_edge(branch_block, then_entry);
        self.add_edge(branch_block, else_entry);

        self.current = then_entry;
        self.build_stmts(then_block)?;
        let then_tail = self.current;

        self.current = else_entry;
        if let Some(else_stmts) = else_block {
            self.build_stmts(else_stmts)?;
        }
        let else_tail = self.current;

        // Both arms always synthesize a join; if both arms terminated
        // (return/break/continue), the join has no live predecessor and is
        // dropped by the reachability sweep in `finish`.
        let join = self.new_block();
        self.close_with_goto(then_tail, join);
        self.close_with_goto(else_tail, join);
        self.current = join;
        Ok(())
    }

    fn build_while(&mut self, cond: &Expr, body: &[Stmt]) -> Result<()> {
        let header = self.new_block();
        let body_entry = self.new_block();
        let after = self.new_block();

        self.close_with_goto(self.current, header);

        self.current = header;
        self.push_stmt(Stmt::ExprStmt(cond.clone()));
        self.set_terminator(
            header,
            Terminator::Loop {
                cond: cond.clone(),
                body_block: body_entry,
                exit_block: after,
            },
        );
        self.add_edge(header, body_entry);
        // A literal `while (true)` never falls through to `after` except via
        // an explicit `break`; omitting the structural edge here lets the
        // reachability sweep prune `after` when the loop has no break.
        if !matches!(cond, Expr::Literal(Literal::Bool(true))) {
            self.add_edge(header, after);
        }

        self.loop_stack.push(LoopContext {
            continue_target: header,
            break_target: after,
        });
        self.current = body_entry;
        self.build_stmts(body)?;
        self.loop_stack.pop();

        self.close_with_goto(self.current, header);

        self.current = after;
        Ok(())
    }

    fn finish(mut self) -> Result<Cfg> {
        if self.is_open(self.current) {
            self.set_terminator(self.current, Terminator::Return(None));
            self.add_edge(self.current, self.exit);
        }

        let mut reachable = reachable_from(&self.blocks, self.entry);
        reachable.insert(self.exit);
        self.blocks.retain(|id, _| reachable.contains(id));
        for block in self.blocks.values_mut() {
            block.predecessors.clear();
            block.successors.retain(|s| reachable.contains(s));
        }
        let edges: Vec<(BlockId, BlockId)> = self
            .blocks
            .values()
            .flat_map(|b| b.successors.iter().map(move |s| (b.id, *s)))
            .collect();
        for (from, to) in edges {
            if let Some(block) = self.blocks.get_mut(&to) {
                block.predecessors.insert(from);
            }
        }

        let discarded = self.next_id - self.blocks.len();
        debug!(blocks = self.blocks.len(), discarded, "CFG construction complete");

        let cfg = Cfg {
            blocks: self.blocks,
            entry: self.entry,
            exit: self.exit,
        };
        cfg.check_invariants()?;
        Ok(cfg)
    }
}
