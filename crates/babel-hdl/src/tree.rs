//! Structured HDL tree.
//!
//! A [`Design`] is a list of [`Module`]s plus the name of the composing top
//! module. Templates build these trees; [`crate::render`] turns them into
//! text, and [`crate::check`] validates them before and after rendering.

/// Port direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
    /// Output driven from a procedural block.
    OutputReg,
}

/// A module port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    pub name: String,
    pub direction: Direction,
    /// Bit range without brackets, e.g. `"31:0"`.
    pub range: Option<String>,
}

impl Port {
    pub fn input(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: Direction::Input,
            range: None,
        }
    }

    pub fn input_bus(name: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: Direction::Input,
            range: Some(range.into()),
        }
    }

    pub fn output(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: Direction::Output,
            range: None,
        }
    }

    pub fn output_bus(name: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: Direction::Output,
            range: Some(range.into()),
        }
    }

    pub fn output_reg(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: Direction::OutputReg,
            range: None,
        }
    }

    pub fn output_reg_bus(name: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: Direction::OutputReg,
            range: Some(range.into()),
        }
    }
}

/// An overridable module parameter with its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

/// Kind of a declared signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetKind {
    Wire,
    Reg,
    Integer,
}

/// A signal declaration, optionally a bus and optionally an array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Net {
    pub kind: NetKind,
    pub name: String,
    pub range: Option<String>,
    /// Array bounds without brackets, e.g. `"0:NUM_REGS-1"`.
    pub depth: Option<String>,
}

impl Net {
    pub fn wire(name: impl Into<String>) -> Self {
        Self::new(NetKind::Wire, name)
    }

    pub fn reg(name: impl Into<String>) -> Self {
        Self::new(NetKind::Reg, name)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(NetKind::Integer, name)
    }

    fn new(kind: NetKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            range: None,
            depth: None,
        }
    }

    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = Some(range.into());
        self
    }

    pub fn with_depth(mut self, depth: impl Into<String>) -> Self {
        self.depth = Some(depth.into());
        self
    }
}

/// Trigger of an `always` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sensitivity {
    /// `@(*)`
    Combinational,
    /// `@(posedge <clock>)`
    Posedge(String),
}

/// A procedural statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Comment(String),
    Blocking {
        lhs: String,
        rhs: String,
    },
    NonBlocking {
        lhs: String,
        rhs: String,
    },
    If {
        cond: String,
        then: Vec<Stmt>,
        otherwise: Vec<Stmt>,
    },
    Case {
        selector: String,
        arms: Vec<CaseArm>,
        default: Vec<Stmt>,
    },
    For {
        init: String,
        cond: String,
        step: String,
        body: Vec<Stmt>,
    },
}

impl Stmt {
    pub fn blocking(lhs: impl Into<String>, rhs: impl Into<String>) -> Self {
        Stmt::Blocking {
            lhs: lhs.into(),
            rhs: rhs.into(),
        }
    }

    pub fn non_blocking(lhs: impl Into<String>, rhs: impl Into<String>) -> Self {
        Stmt::NonBlocking {
            lhs: lhs.into(),
            rhs: rhs.into(),
        }
    }

    pub fn if_then(cond: impl Into<String>, then: Vec<Stmt>) -> Self {
        Stmt::If {
            cond: cond.into(),
            then,
            otherwise: Vec::new(),
        }
    }

    pub fn if_else(cond: impl Into<String>, then: Vec<Stmt>, otherwise: Vec<Stmt>) -> Self {
        Stmt::If {
            cond: cond.into(),
            then,
            otherwise,
        }
    }

    /// Counting loop `for (var = 0; var < bound; var = var + 1)`.
    pub fn count_loop(var: &str, bound: impl AsRef<str>, body: Vec<Stmt>) -> Self {
        Stmt::For {
            init: format!("{var} = 0"),
            cond: format!("{var} < {}", bound.as_ref()),
            step: format!("{var} = {var} + 1"),
            body,
        }
    }
}

/// One labelled branch of a `case` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseArm {
    pub label: String,
    pub body: Vec<Stmt>,
}

impl CaseArm {
    pub fn new(label: impl Into<String>, body: Vec<Stmt>) -> Self {
        Self {
            label: label.into(),
            body,
        }
    }
}

/// A port binding on an instance. `None` leaves the port unconnected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub port: String,
    pub net: Option<String>,
}

/// Instantiation of one module inside another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub module: String,
    pub name: String,
    pub parameters: Vec<(String, String)>,
    pub connections: Vec<Connection>,
}

impl Instance {
    /// Instance of `module` with ports bound by name from `bindings`.
    ///
    /// Connections follow the module's port order. Ports with no binding
    /// are left open; bindings naming ports the module lacks are dropped,
    /// which lets one binding table serve every template variant.
    pub fn wired(module: &Module, name: impl Into<String>, bindings: &[(&str, &str)]) -> Self {
        let connections = module
            .ports
            .iter()
            .map(|port| Connection {
                port: port.name.clone(),
                net: bindings
                    .iter()
                    .find(|(p, _)| *p == port.name)
                    .map(|(_, net)| (*net).to_string()),
            })
            .collect();
        Self {
            module: module.name.clone(),
            name: name.into(),
            parameters: Vec::new(),
            connections,
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push((name.into(), value.into()));
        self
    }
}

/// A module-level item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Comment(String),
    LocalParam { name: String, value: String },
    Net(Net),
    Assign { lhs: String, rhs: String },
    Always { sensitivity: Sensitivity, body: Vec<Stmt> },
    Initial(Vec<Stmt>),
    Instance(Instance),
}

impl Item {
    pub fn comment(text: impl Into<String>) -> Self {
        Item::Comment(text.into())
    }

    pub fn localparam(name: impl Into<String>, value: impl Into<String>) -> Self {
        Item::LocalParam {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn assign(lhs: impl Into<String>, rhs: impl Into<String>) -> Self {
        Item::Assign {
            lhs: lhs.into(),
            rhs: rhs.into(),
        }
    }

    pub fn comb(body: Vec<Stmt>) -> Self {
        Item::Always {
            sensitivity: Sensitivity::Combinational,
            body,
        }
    }

    pub fn posedge(clock: impl Into<String>, body: Vec<Stmt>) -> Self {
        Item::Always {
            sensitivity: Sensitivity::Posedge(clock.into()),
            body,
        }
    }
}

/// A named structural block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub ports: Vec<Port>,
    pub items: Vec<Item>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            ports: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_port(mut self, port: Port) -> Self {
        self.ports.push(port);
        self
    }

    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name == name)
    }

    /// Instances declared directly in this module.
    pub fn instances(&self) -> impl Iterator<Item = &Instance> {
        self.items.iter().filter_map(|item| match item {
            Item::Instance(inst) => Some(inst),
            _ => None,
        })
    }
}

/// A complete design: sub-blocks plus one composing top module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Design {
    /// Comment lines rendered before the first module.
    pub header: Vec<String>,
    pub modules: Vec<Module>,
    pub top: String,
}

impl Design {
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn top_module(&self) -> Option<&Module> {
        self.module(&self.top)
    }

    /// Number of instances of `module` anywhere in the design.
    pub fn instance_count(&self, module: &str) -> usize {
        self.modules
            .iter()
            .flat_map(Module::instances)
            .filter(|inst| inst.module == module)
            .count()
    }

    pub fn module_names(&self) -> Vec<String> {
        self.modules.iter().map(|m| m.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adder() -> Module {
        Module::new("adder")
            .with_port(Port::input_bus("a", "7:0"))
            .with_port(Port::input_bus("b", "7:0"))
            .with_port(Port::output_bus("sum", "7:0"))
    }

    #[test]
    fn wired_instance_follows_port_order() {
        let inst = Instance::wired(&adder(), "u0", &[("sum", "s"), ("a", "x"), ("carry", "c")]);
        let ports: Vec<&str> = inst.connections.iter().map(|c| c.port.as_str()).collect();
        assert_eq!(ports, vec!["a", "b", "sum"]);
        assert_eq!(inst.connections[0].net.as_deref(), Some("x"));
        assert!(inst.connections[1].net.is_none());
        assert_eq!(inst.connections[2].net.as_deref(), Some("s"));
    }

    #[test]
    fn instance_count_spans_modules() {
        let mut top = Module::new("top");
        top.push(Item::Instance(Instance::wired(&adder(), "u0", &[])));
        let design = Design {
            header: vec![],
            modules: vec![adder(), top],
            top: "top".into(),
        };
        assert_eq!(design.instance_count("adder"), 1);
        assert_eq!(design.instance_count("top"), 0);
        assert_eq!(design.top_module().map(|m| m.name.as_str()), Some("top"));
    }

    #[test]
    fn count_loop_shape() {
        let stmt = Stmt::count_loop("i", "NUM_REGS", vec![]);
        match stmt {
            Stmt::For { init, cond, step, .. } => {
                assert_eq!(init, "i = 0");
                assert_eq!(cond, "i < NUM_REGS");
                assert_eq!(step, "i = i + 1");
            }
            other => panic!("unexpected statement {other:?}"),
        }
    }
}
