pub mod pattern;

use serde::{Deserialize, Serialize};

use crate::catalog::pattern::Pattern;

/// A palette entry: the read-only descriptor of one kind of block.
/// Supplied once at startup and never mutated by the editor.
///
/// Deserialization accepts both the canonical field names and the names the
/// sandbox's palette endpoint serves (`id`, `template`, `accepts_children`,
/// `has_else`), so a saved palette reply loads unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockTemplate {
    /// Stable kind identifier, e.g. "if_else_block".
    #[serde(alias = "id")]
    pub kind: String,
    /// Human-facing palette label.
    #[serde(default)]
    pub label: String,
    /// Statement pattern with `{slot}` placeholders.
    #[serde(alias = "template")]
    pub pattern: Pattern,
    /// Input-field order the palette UI presents. May disagree with the
    /// names actually present in `pattern`; `blockpad check` flags that.
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Whether placed instances may hold a child statement sequence.
    #[serde(default, alias = "accepts_children")]
    pub accepts_body: bool,
    /// Whether placed instances additionally carry an else-sequence.
    /// Only meaningful on container kinds.
    #[serde(default, alias = "has_else")]
    pub has_alternate_body: bool,
    /// Reserved for slot-as-expression use; code generation ignores it.
    #[serde(default)]
    pub is_expression: bool,
}

/// One palette group with its display styling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    /// Palette color, e.g. "#8b5cf6". Cosmetic only.
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon: String,
    pub blocks: Vec<BlockTemplate>,
}

/// The whole palette.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<Category>,
}

impl Catalog {
    /// Look up a template by kind across all categories. First match wins.
    pub fn template(&self, kind: &str) -> Option<&BlockTemplate> {
        self.templates().find(|t| t.kind == kind)
    }

    /// All templates in palette order.
    pub fn templates(&self) -> impl Iterator<Item = &BlockTemplate> {
        self.categories.iter().flat_map(|c| &c.blocks)
    }

    /// The palette the sandbox ships: seven categories of statement and
    /// expression templates.
    pub fn builtin() -> Catalog {
        Catalog {
            categories: vec![
                category(
                    "variables",
                    "#8b5cf6",
                    "x",
                    vec![
                        entry("var_create", "Create variable", "{name} = {value}", &["name", "value"]),
                        entry("var_set", "Set variable", "{name} = {value}", &["name", "value"]),
                        entry("var_change", "Change by", "{name} += {value}", &["name", "value"]),
                        entry("var_print", "Print variable", "print({name})", &["name"]),
                        entry("var_multiply", "Multiply by", "{name} *= {value}", &["name", "value"]),
                        entry("var_divide", "Divide by", "{name} /= {value}", &["name", "value"]),
                    ],
                ),
                category(
                    "control",
                    "#f59e0b",
                    "↻",
                    vec![
                        container("if_block", "If", "if {condition}:", &["condition"]),
                        BlockTemplate {
                            has_alternate_body: true,
                            ..container("if_else_block", "If-Else", "if {condition}:", &["condition"])
                        },
                        container("repeat_times", "Repeat times", "for _ in range({times}):", &["times"]),
                        container(
                            "for_range",
                            "For i in range",
                            "for {var} in range({start}, {end}):",
                            &["var", "start", "end"],
                        ),
                        container("while_block", "While", "while {condition}:", &["condition"]),
                        entry("break_block", "Break", "break", &[]),
                        entry("continue_block", "Continue", "continue", &[]),
                    ],
                ),
                category(
                    "output",
                    "#10b981",
                    "⎙",
                    vec![
                        entry("print_msg", "Print", "print({message})", &["message"]),
                        entry("print_multiple", "Print multiple", "print({item1}, {item2})", &["item1", "item2"]),
                        entry("print_input", "Input", "{name} = input({prompt})", &["name", "prompt"]),
                        entry("print_fstring", "Print formatted", "print(f\"{text}{{name}}\")", &["text", "name"]),
                    ],
                ),
                category(
                    "operators",
                    "#3b82f6",
                    "+",
                    vec![
                        expression("compare", "Compare", "{a} {op} {b}", &["a", "op", "b"]),
                        expression("math_add", "Add", "{a} + {b}", &["a", "b"]),
                        expression("math_subtract", "Subtract", "{a} - {b}", &["a", "b"]),
                        expression("math_multiply", "Multiply", "{a} * {b}", &["a", "b"]),
                        expression("math_divide", "Divide", "{a} / {b}", &["a", "b"]),
                        expression("math_modulo", "Remainder (mod)", "{a} % {b}", &["a", "b"]),
                        expression("math_power", "Power", "{a} ** {b}", &["a", "b"]),
                    ],
                ),
                category(
                    "logic",
                    "#ec4899",
                    "◇",
                    vec![
                        expression("logic_and", "And", "{a} and {b}", &["a", "b"]),
                        expression("logic_or", "Or", "{a} or {b}", &["a", "b"]),
                        expression("logic_not", "Not", "not {a}", &["a"]),
                        expression("logic_true", "True", "True", &[]),
                        expression("logic_false", "False", "False", &[]),
                    ],
                ),
                category(
                    "lists",
                    "#06b6d4",
                    "[]",
                    vec![
                        entry("list_create", "Create list", "{name} = []", &["name"]),
                        entry("list_create_items", "Create list with", "{name} = [{items}]", &["name", "items"]),
                        entry("list_append", "Add to list", "{name}.append({value})", &["name", "value"]),
                        expression("list_get", "Get item at", "{name}[{index}]", &["name", "index"]),
                        entry("list_set", "Set item at", "{name}[{index}] = {value}", &["name", "index", "value"]),
                        expression("list_length", "Length of list", "len({name})", &["name"]),
                        container("list_for", "For each in list", "for {item} in {list}:", &["item", "list"]),
                        entry("list_remove", "Remove from list", "{name}.remove({value})", &["name", "value"]),
                    ],
                ),
                category(
                    "functions",
                    "#f97316",
                    "fn",
                    vec![
                        expression("func_abs", "Absolute value", "abs({value})", &["value"]),
                        expression("func_max", "Maximum", "max({a}, {b})", &["a", "b"]),
                        expression("func_min", "Minimum", "min({a}, {b})", &["a", "b"]),
                        expression("func_round", "Round", "round({value})", &["value"]),
                        expression("func_int", "Convert to int", "int({value})", &["value"]),
                        expression("func_str", "Convert to string", "str({value})", &["value"]),
                        expression("func_sum", "Sum of list", "sum({list})", &["list"]),
                    ],
                ),
            ],
        }
    }
}

/// Seed value for a freshly created slot. Unknown slots start empty.
pub fn slot_default(name: &str) -> &'static str {
    match name {
        "name" => "x",
        "value" => "10",
        "condition" => "x > 5",
        "times" => "3",
        "var" => "i",
        "start" => "0",
        "end" => "5",
        "message" => "\"Hello!\"",
        "item1" => "\"a\"",
        "item2" => "\"b\"",
        "prompt" => "\"? \"",
        "text" => "\"x = \"",
        "a" => "1",
        "b" => "2",
        "op" => "==",
        "items" => "1, 2, 3",
        "index" => "0",
        "list" => "items",
        "item" => "item",
        _ => "",
    }
}

fn category(name: &str, color: &str, icon: &str, blocks: Vec<BlockTemplate>) -> Category {
    Category {
        name: name.to_string(),
        color: color.to_string(),
        icon: icon.to_string(),
        blocks,
    }
}

fn entry(kind: &str, label: &str, pattern: &str, inputs: &[&str]) -> BlockTemplate {
    BlockTemplate {
        kind: kind.to_string(),
        label: label.to_string(),
        pattern: Pattern::parse(pattern),
        inputs: inputs.iter().map(|s| s.to_string()).collect(),
        accepts_body: false,
        has_alternate_body: false,
        is_expression: false,
    }
}

fn container(kind: &str, label: &str, pattern: &str, inputs: &[&str]) -> BlockTemplate {
    BlockTemplate {
        accepts_body: true,
        ..entry(kind, label, pattern, inputs)
    }
}

fn expression(kind: &str, label: &str, pattern: &str, inputs: &[&str]) -> BlockTemplate {
    BlockTemplate {
        is_expression: true,
        ..entry(kind, label, pattern, inputs)
    }
}
