pub mod stmt;

pub use stmt::{
    AddOp, Block, CompareOp, Expr, Literal, MulOp, Pos, Span, Stmt,
};
