//! Verilog-2001 rendering of a [`Design`].
//!
//! Every procedural body is wrapped in `begin`/`end`, even when it holds a
//! single statement, so that block structure in the text mirrors the tree
//! one-to-one.

use crate::tree::{
    Connection, Design, Direction, Instance, Item, Module, Net, NetKind, Sensitivity, Stmt,
};

const INDENT: &str = "    ";

struct Writer {
    out: String,
    depth: usize,
}

impl Writer {
    fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn indented(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }
}

/// Render the whole design as Verilog text.
pub fn render(design: &Design) -> String {
    let mut w = Writer::new();
    for line in &design.header {
        w.line(&format!("// {line}"));
    }
    for module in &design.modules {
        w.blank();
        render_module(&mut w, module);
    }
    w.out
}

/// Render a single module.
pub fn render_module_text(module: &Module) -> String {
    let mut w = Writer::new();
    render_module(&mut w, module);
    w.out
}

fn render_module(w: &mut Writer, module: &Module) {
    if module.parameters.is_empty() {
        w.line(&format!("module {} (", module.name));
    } else {
        w.line(&format!("module {} #(", module.name));
        w.indented(|w| {
            let last = module.parameters.len() - 1;
            for (i, p) in module.parameters.iter().enumerate() {
                let sep = if i == last { "" } else { "," };
                w.line(&format!("parameter {} = {}{sep}", p.name, p.value));
            }
        });
        w.line(") (");
    }
    w.indented(|w| {
        let last = module.ports.len().saturating_sub(1);
        for (i, port) in module.ports.iter().enumerate() {
            let sep = if i == last { "" } else { "," };
            let dir = match port.direction {
                Direction::Input => "input",
                Direction::Output => "output",
                Direction::OutputReg => "output reg",
            };
            w.line(&format!("{dir}{}{}{sep}", range(&port.range), port.name));
        }
    });
    w.line(");");

    w.indented(|w| {
        let mut prev_was_block = false;
        for (i, item) in module.items.iter().enumerate() {
            let is_block = matches!(
                item,
                Item::Always { .. } | Item::Initial(_) | Item::Instance(_)
            );
            if i > 0 && (is_block || prev_was_block || matches!(item, Item::Comment(_))) {
                w.blank();
            }
            render_item(w, item);
            prev_was_block = is_block;
        }
    });
    w.line("endmodule");
}

fn range(r: &Option<String>) -> String {
    match r {
        Some(r) => format!(" [{r}] "),
        None => " ".to_string(),
    }
}

fn render_item(w: &mut Writer, item: &Item) {
    match item {
        Item::Comment(text) => w.line(&format!("// {text}")),
        Item::LocalParam { name, value } => w.line(&format!("localparam {name} = {value};")),
        Item::Net(net) => w.line(&net_decl(net)),
        Item::Assign { lhs, rhs } => w.line(&format!("assign {lhs} = {rhs};")),
        Item::Always { sensitivity, body } => {
            let trigger = match sensitivity {
                Sensitivity::Combinational => "*".to_string(),
                Sensitivity::Posedge(clock) => format!("posedge {clock}"),
            };
            w.line(&format!("always @({trigger}) begin"));
            render_body(w, body);
            w.line("end");
        }
        Item::Initial(body) => {
            w.line("initial begin");
            render_body(w, body);
            w.line("end");
        }
        Item::Instance(inst) => render_instance(w, inst),
    }
}

fn net_decl(net: &Net) -> String {
    let kind = match net.kind {
        NetKind::Wire => "wire",
        NetKind::Reg => "reg",
        NetKind::Integer => "integer",
    };
    let depth = net
        .depth
        .as_ref()
        .map(|d| format!(" [{d}]"))
        .unwrap_or_default();
    format!("{kind}{}{}{depth};", range(&net.range), net.name)
}

fn render_instance(w: &mut Writer, inst: &Instance) {
    let params = if inst.parameters.is_empty() {
        String::new()
    } else {
        let bound: Vec<String> = inst
            .parameters
            .iter()
            .map(|(name, value)| format!(".{name}({value})"))
            .collect();
        format!(" #({})", bound.join(", "))
    };
    w.line(&format!("{}{params} {} (", inst.module, inst.name));
    w.indented(|w| {
        let last = inst.connections.len().saturating_sub(1);
        for (i, Connection { port, net }) in inst.connections.iter().enumerate() {
            let sep = if i == last { "" } else { "," };
            w.line(&format!(".{port}({}){sep}", net.as_deref().unwrap_or("")));
        }
    });
    w.line(");");
}

fn render_body(w: &mut Writer, body: &[Stmt]) {
    w.indented(|w| {
        for stmt in body {
            render_stmt(w, stmt);
        }
    });
}

fn render_stmt(w: &mut Writer, stmt: &Stmt) {
    match stmt {
        Stmt::Comment(text) => w.line(&format!("// {text}")),
        Stmt::Blocking { lhs, rhs } => w.line(&format!("{lhs} = {rhs};")),
        Stmt::NonBlocking { lhs, rhs } => w.line(&format!("{lhs} <= {rhs};")),
        Stmt::If {
            cond,
            then,
            otherwise,
        } => {
            w.line(&format!("if ({cond}) begin"));
            render_body(w, then);
            if otherwise.is_empty() {
                w.line("end");
            } else {
                w.line("end else begin");
                render_body(w, otherwise);
                w.line("end");
            }
        }
        Stmt::Case {
            selector,
            arms,
            default,
        } => {
            w.line(&format!("case ({selector})"));
            w.indented(|w| {
                for arm in arms {
                    w.line(&format!("{}: begin", arm.label));
                    render_body(w, &arm.body);
                    w.line("end");
                }
                w.line("default: begin");
                render_body(w, default);
                w.line("end");
            });
            w.line("endcase");
        }
        Stmt::For {
            init,
            cond,
            step,
            body,
        } => {
            w.line(&format!("for ({init}; {cond}; {step}) begin"));
            render_body(w, body);
            w.line("end");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{CaseArm, Port};

    #[test]
    fn renders_parameterized_header() {
        let module = Module::new("counter")
            .with_parameter("WIDTH", "8")
            .with_port(Port::input("clk"))
            .with_port(Port::output_reg_bus("count", "WIDTH-1:0"));
        let text = render_module_text(&module);
        assert_eq!(
            text,
            "module counter #(\n    parameter WIDTH = 8\n) (\n    input clk,\n    output reg [WIDTH-1:0] count\n);\nendmodule\n"
        );
    }

    #[test]
    fn renders_case_with_default() {
        let mut module = Module::new("m").with_port(Port::input_bus("sel", "1:0"));
        module.push(Item::Net(Net::reg("y")));
        module.push(Item::comb(vec![Stmt::Case {
            selector: "sel".into(),
            arms: vec![CaseArm::new("2'd0", vec![Stmt::blocking("y", "1'b1")])],
            default: vec![Stmt::blocking("y", "1'b0")],
        }]));
        let text = render_module_text(&module);
        assert!(text.contains("    reg y;\n"));
        assert!(text.contains("always @(*) begin\n        case (sel)\n            2'd0: begin\n                y = 1'b1;\n            end\n"));
        assert!(text.contains("            default: begin\n                y = 1'b0;\n            end\n        endcase\n    end\n"));
    }

    #[test]
    fn renders_if_else_and_open_ports() {
        let child = Module::new("child")
            .with_port(Port::input("a"))
            .with_port(Port::input("b"));
        let mut top = Module::new("top").with_port(Port::input("clk"));
        top.push(Item::posedge(
            "clk",
            vec![Stmt::if_else(
                "a",
                vec![Stmt::non_blocking("q", "1'b1")],
                vec![Stmt::non_blocking("q", "1'b0")],
            )],
        ));
        top.push(Item::Instance(
            Instance::wired(&child, "u_child", &[("a", "clk")]).with_parameter("N", "2"),
        ));
        let text = render_module_text(&top);
        assert!(text.contains("if (a) begin\n            q <= 1'b1;\n        end else begin\n"));
        assert!(text.contains("child #(.N(2)) u_child (\n        .a(clk),\n        .b()\n    );\n"));
    }

    #[test]
    fn renders_arrays() {
        let net = Net::reg("mem").with_range("63:0").with_depth("0:1023");
        assert_eq!(net_decl(&net), "reg [63:0] mem [0:1023];");
        assert_eq!(net_decl(&Net::integer("i")), "integer i;");
    }
}
