//! # Statement Tree Module
//!
//! The parser's output and the renderer's input: a closed, tagged [`Statement`] variant where every
//! case knows how to turn itself into a fragment of C source text via [`Statement::render`].
//!
//! Rendering is pure, total over well-formed trees, and depends only on a node's own fields and its
//! children's `render()` output — there is no shared mutable state and no I/O anywhere in this
//! module. A malformed tree (e.g. one the parser never actually produces) is a precondition
//! violation the renderer does not try to diagnose; see the crate-level error handling notes.

use crate::vellum::typechecker::{builtin_to_c, BuiltinType};

/// An ordered, owned sequence of statements. Appears both as a bare [`Statement::Block`] (a nested
/// compound statement) and as the field type for every construct that groups statements together
/// (a function body, a loop body, a Module's struct/function lists).
#[derive(Debug, Clone, Default)]
pub struct Block(pub Vec<Statement>);

impl Block {
    /// Builds a block from its children, in order.
    pub fn new(statements: Vec<Statement>) -> Self {
        Block(statements)
    }

    /// Whether this block has no children.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The child statements, in order.
    pub fn statements(&self) -> &[Statement] {
        &self.0
    }

    /// Concatenates each child's render, inserting `"\n"` after every child except `Empty` ones.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for stmt in &self.0 {
            out.push_str(&stmt.render());
            if !matches!(stmt, Statement::Empty) {
                out.push('\n');
            }
        }
        out
    }
}

/// The closed set of statement-tree node kinds produced by the parser.
///
/// Every variant renders to a C fragment through [`Statement::render`]; see the module documentation
/// for the rendering guarantees.
#[derive(Debug, Clone)]
pub enum Statement {
    /// Renders to the empty string. Produced by the parser where a statement is syntactically
    /// optional and absent (e.g. a `for`-loop with no initializer, rendered as its own `Empty`
    /// init-child).
    Empty,
    /// A nested compound statement.
    Block(Block),
    /// The translation-unit root: includes, struct declarations, function definitions.
    Module {
        /// Name of the compiled module. Ignored by `render`; kept for diagnostics and for the
        /// driver to name its output file.
        name: String,
        /// Already-bracketed/quoted include directives, e.g. `"<stdio.h>"` or `"\"local.h\""`.
        includes: Vec<String>,
        /// Struct declarations. Every child must be `Statement::Struct`.
        structs: Block,
        /// Function definitions. Every child must be `Statement::Function`.
        functions: Block,
    },
    /// A function definition.
    Function {
        /// Function name.
        name: String,
        /// Raw, pre-parsing argument-list text (e.g. `"i32 x, mut u8* y"`); parsed at render time.
        raw_args: String,
        /// Declared return type.
        return_type: BuiltinType,
        /// Function body.
        body: Block,
    },
    /// A conditional.
    If {
        /// Opaque condition expression text.
        condition: String,
        /// Taken when the condition is true.
        then_block: Block,
        /// Taken when the condition is false; empty (no children) when there is no `else`.
        else_block: Block,
    },
    /// A `return` statement. Expression text is opaque and may be empty (a bare `return;`).
    Return(String),
    /// A local variable declaration with initializer.
    Variable {
        /// Whether the declaration is mutable (renders without a `const` qualifier).
        mutable: bool,
        /// Declared type.
        ty: BuiltinType,
        /// Pointer-style extension, e.g. `"*"`, `"**"`, or `""`.
        extension: String,
        /// Variable name.
        name: String,
        /// Opaque initializer expression text.
        init: String,
    },
    /// A compound-assignment `NAME += EXPR;` statement.
    PlusEqual {
        /// The assignment target.
        name: String,
        /// Opaque right-hand expression text.
        expr: String,
    },
    /// A `while` loop.
    While {
        /// Opaque condition expression text.
        condition: String,
        /// Loop body.
        body: Block,
    },
    /// A `for` loop. The initializer is exclusively owned by this node.
    For {
        /// The loop's initializer statement (typically `Variable` or `Expression`).
        init: Box<Statement>,
        /// Opaque condition expression text (no trailing `;` — `render` supplies it).
        condition: String,
        /// Opaque increment expression text (no leading/trailing punctuation).
        increment: String,
        /// Loop body.
        body: Block,
    },
    /// A bare expression statement.
    Expression(String),
    /// An array declaration with a brace-enclosed initializer list.
    Array {
        /// Whether the declaration is mutable.
        mutable: bool,
        /// Element type.
        ty: BuiltinType,
        /// Array-style extension, e.g. `"[]"` or `"[4]"`.
        extension: String,
        /// Array name.
        name: String,
        /// Opaque, comma-separated literal list text (without the surrounding braces).
        elements: String,
    },
    /// An indexed assignment `NAME[INDEX] = EXPR;`.
    IndexOperator {
        /// The array/pointer being indexed.
        name: String,
        /// Opaque index expression text.
        index: String,
        /// Opaque right-hand expression text.
        value: String,
    },
    /// A bare function-call statement.
    FunctionCall {
        /// Callee name.
        name: String,
        /// Opaque, comma-separated argument-list text.
        args: String,
    },
    /// A struct declaration, emitted as a C `typedef struct`.
    Struct {
        /// Struct (and typedef alias) name.
        name: String,
        /// Fully-formed C member declarations (without trailing `;`).
        members: Vec<String>,
    },
}

impl Statement {
    /// Renders this node (and, recursively, its children) to a fragment of C source text.
    ///
    /// Pure and total over well-formed trees: depends only on `self`'s fields and the `render()`
    /// output of any child blocks/statements.
    pub fn render(&self) -> String {
        match self {
            Statement::Empty => String::new(),
            Statement::Block(block) => block.render(),
            Statement::Module {
                includes,
                structs,
                functions,
                ..
            } => render_module(includes, structs, functions),
            Statement::Function {
                name,
                raw_args,
                return_type,
                body,
            } => {
                let ret = builtin_to_c(*return_type);
                let args = render_function_args(raw_args);
                format!("{ret} {name}({args}) {{\n{}}}", body.render())
            }
            Statement::If {
                condition,
                then_block,
                else_block,
            } => render_if(condition, then_block, else_block),
            Statement::Return(expr) => format!("return {expr};"),
            Statement::Variable {
                mutable,
                ty,
                extension,
                name,
                init,
            } => {
                let prefix = if *mutable { "" } else { "const " };
                format!("{prefix}{}{extension} {name} = {init};", builtin_to_c(*ty))
            }
            Statement::PlusEqual { name, expr } => format!("{name} += {expr};"),
            Statement::While { condition, body } => {
                format!("while ({condition}) {{\n{}}}\n", body.render())
            }
            Statement::For {
                init,
                condition,
                increment,
                body,
            } => {
                format!(
                    "for ({} {condition}; {increment}) {{\n{}}}\n",
                    init.render(),
                    body.render()
                )
            }
            Statement::Expression(expr) => format!("{expr};"),
            Statement::Array {
                mutable,
                ty,
                extension,
                name,
                elements,
            } => {
                let prefix = if *mutable { "" } else { "const " };
                format!(
                    "{prefix}{} {name}{extension} = {{ {elements} }};",
                    builtin_to_c(*ty)
                )
            }
            Statement::IndexOperator { name, index, value } => {
                format!("{name}[{index}] = {value};")
            }
            Statement::FunctionCall { name, args } => format!("{name}({args});"),
            Statement::Struct { name, members } => render_struct(name, members),
        }
    }
}

fn render_module(includes: &[String], structs: &Block, functions: &Block) -> String {
    let mut out = String::new();
    for directive in includes {
        let inner = strip_brackets(directive);
        out.push_str("#include <");
        out.push_str(inner);
        out.push_str(">\n");
    }
    out.push('\n');
    out.push_str(&structs.render());
    out.push('\n');
    out.push_str(&functions.render());
    out
}

/// Strips the first and last character of an include directive (its surrounding `<>` or `""`),
/// leaving the bare path. The directive is always emitted back with `<>` regardless of how it was
/// originally delimited.
fn strip_brackets(directive: &str) -> &str {
    let len = directive.len();
    if len >= 2 {
        &directive[1..len - 1]
    } else {
        directive
    }
}

fn render_if(condition: &str, then_block: &Block, else_block: &Block) -> String {
    let mut out = format!("if ({condition}) {{\n{}", then_block.render());
    if !else_block.is_empty() {
        out.push_str("} else {\n");
        out.push_str(&else_block.render());
    }
    out.push_str("}\n");
    out
}

fn render_struct(name: &str, members: &[String]) -> String {
    let mut out = format!("typedef struct {name} {{\n");
    for member in members {
        out.push_str("    ");
        out.push_str(member);
        out.push_str(";\n");
    }
    out.push_str("} ");
    out.push_str(name);
    out.push_str(";\n");
    out
}

/// Parses a raw, comma-separated argument-list string into rendered C parameter declarations.
///
/// Each item splits on single spaces into `[mut] TYPE [EXT...] NAME`, per the Function rendering
/// contract: `mut` (if present) suppresses the `const` prefix, the type maps through
/// [`builtin_to_c`], any extension pieces (e.g. `*`) concatenate onto the type with no space, and the
/// name follows after exactly one space.
fn render_function_args(raw_args: &str) -> String {
    let trimmed = raw_args.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    trimmed
        .split(',')
        .map(|item| render_arg_item(item.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_arg_item(item: &str) -> String {
    let mut pieces: Vec<&str> = item.split(' ').filter(|p| !p.is_empty()).collect();

    let mutable = pieces.first() == Some(&"mut");
    if mutable {
        pieces.remove(0);
    }

    let name = pieces.pop().unwrap_or_default();
    let ty_piece = pieces.first().copied().unwrap_or_default();
    let extension: String = pieces.iter().skip(1).copied().collect();

    let ty = BuiltinType::from_source_name(ty_piece)
        .map(builtin_to_c)
        .unwrap_or(ty_piece);
    let prefix = if mutable { "" } else { "const " };

    format!("{prefix}{ty}{extension} {name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s4_variable_render() {
        let immutable = Statement::Variable {
            mutable: false,
            ty: BuiltinType::I32,
            extension: String::new(),
            name: "x".to_string(),
            init: "42".to_string(),
        };
        assert_eq!(immutable.render(), "const int32_t x = 42;");

        let mutable = Statement::Variable {
            mutable: true,
            ty: BuiltinType::I32,
            extension: String::new(),
            name: "x".to_string(),
            init: "42".to_string(),
        };
        assert_eq!(mutable.render(), "int32_t x = 42;");
    }

    #[test]
    fn s5_if_with_else() {
        let stmt = Statement::If {
            condition: "x == 0".to_string(),
            then_block: Block::new(vec![Statement::Return("1".to_string())]),
            else_block: Block::new(vec![Statement::Return("2".to_string())]),
        };
        assert_eq!(
            stmt.render(),
            "if (x == 0) {\nreturn 1;\n} else {\nreturn 2;\n}\n"
        );
    }

    #[test]
    fn if_without_else_omits_else_clause() {
        let stmt = Statement::If {
            condition: "ok".to_string(),
            then_block: Block::new(vec![Statement::Return("1".to_string())]),
            else_block: Block::default(),
        };
        assert_eq!(stmt.render(), "if (ok) {\nreturn 1;\n}\n");
    }

    #[test]
    fn s6_module_well_formedness() {
        let module = Statement::Module {
            name: "ignored".to_string(),
            includes: vec!["<stdio.h>".to_string()],
            structs: Block::default(),
            functions: Block::new(vec![Statement::Function {
                name: "main".to_string(),
                raw_args: String::new(),
                return_type: BuiltinType::I32,
                body: Block::new(vec![Statement::Return("0".to_string())]),
            }]),
        };
        let rendered = module.render();
        assert!(rendered.starts_with("#include <stdio.h>\n\n"));
        assert_eq!(
            rendered,
            "#include <stdio.h>\n\n\nint32_t main() {\nreturn 0;\n}\n"
        );
    }

    #[test]
    fn block_composition_skips_newline_after_empty() {
        let block = Block::new(vec![
            Statement::Return("1".to_string()),
            Statement::Empty,
            Statement::Expression("f()".to_string()),
        ]);
        assert_eq!(block.render(), "return 1;\nf();\n");
    }

    #[test]
    fn function_args_render_mut_and_pointer_extension() {
        let stmt = Statement::Function {
            name: "copy".to_string(),
            raw_args: "i32 x, mut u8 * y".to_string(),
            return_type: BuiltinType::Void,
            body: Block::default(),
        };
        assert_eq!(stmt.render(), "void copy(const int32_t x, uint8_t* y) {\n}");
    }

    #[test]
    fn plus_equal_and_index_and_call_render() {
        assert_eq!(
            Statement::PlusEqual {
                name: "total".to_string(),
                expr: "1".to_string()
            }
            .render(),
            "total += 1;"
        );
        assert_eq!(
            Statement::IndexOperator {
                name: "arr".to_string(),
                index: "i".to_string(),
                value: "0".to_string(),
            }
            .render(),
            "arr[i] = 0;"
        );
        assert_eq!(
            Statement::FunctionCall {
                name: "PrintF".to_string(),
                args: "\"hi\"".to_string(),
            }
            .render(),
            "PrintF(\"hi\");"
        );
    }

    #[test]
    fn array_render_places_extension_after_name() {
        let stmt = Statement::Array {
            mutable: false,
            ty: BuiltinType::I32,
            extension: "[3]".to_string(),
            name: "xs".to_string(),
            elements: "1, 2, 3".to_string(),
        };
        assert_eq!(stmt.render(), "const int32_t xs[3] = { 1, 2, 3 };");
    }

    #[test]
    fn for_render_joins_init_condition_increment() {
        let stmt = Statement::For {
            init: Box::new(Statement::Variable {
                mutable: true,
                ty: BuiltinType::I32,
                extension: String::new(),
                name: "i".to_string(),
                init: "0".to_string(),
            }),
            condition: "i < 10".to_string(),
            increment: "i += 1".to_string(),
            body: Block::new(vec![Statement::Expression("step()".to_string())]),
        };
        assert_eq!(
            stmt.render(),
            "for (int32_t i = 0; i < 10; i += 1) {\nstep();\n}\n"
        );
    }

    #[test]
    fn struct_render_typedefs_members() {
        let stmt = Statement::Struct {
            name: "Point".to_string(),
            members: vec!["int32_t x".to_string(), "int32_t y".to_string()],
        };
        assert_eq!(
            stmt.render(),
            "typedef struct Point {\n    int32_t x;\n    int32_t y;\n} Point;\n"
        );
    }
}
