//! Memory interfaces.
//!
//! `simple` is a word-addressed store with a registered read port, so data
//! appears `LATENCY` (one) cycle after the address. `cached` puts a
//! direct-mapped, write-through cache of 16 lines by 4 words in front of the
//! same backing store and exposes a `hit` flag.

use babel_core::{MemoryInterface, ParameterSet};

use crate::isa::DATA_WIDTH;
use crate::tree::{Item, Module, Net, Port, Stmt};

/// Word-indexed backing store depth.
const BACKING_WORDS: usize = 1024;
const CACHE_LINES: usize = 16;
const WORDS_PER_LINE: usize = 4;

/// Module name of a memory interface variant.
pub fn module_name(memory: MemoryInterface) -> &'static str {
    match memory {
        MemoryInterface::Simple => "memory_simple",
        MemoryInterface::Cached => "memory_cached",
    }
}

/// Memory interface chosen by the parameter set.
pub fn memory(params: &ParameterSet) -> Module {
    match params.memory_interface() {
        MemoryInterface::Simple => simple(),
        MemoryInterface::Cached => cached(),
    }
}

fn common_ports(module: Module) -> Module {
    module
        .with_parameter("WIDTH", DATA_WIDTH.to_string())
        .with_parameter("DEPTH", BACKING_WORDS.to_string())
        .with_port(Port::input("clk"))
}

fn data_ports(module: Module, rdata: Port) -> Module {
    module
        .with_port(Port::input("we"))
        .with_port(Port::input_bus("addr", "WIDTH-1:0"))
        .with_port(Port::input_bus("wdata", "WIDTH-1:0"))
        .with_port(rdata)
}

fn simple() -> Module {
    let mut m = data_ports(
        common_ports(Module::new(module_name(MemoryInterface::Simple)))
            .with_parameter("LATENCY", "1"),
        Port::output_reg_bus("rdata", "WIDTH-1:0"),
    );
    m.push(Item::comment("Direct backing store, read registered on the clock edge"));
    m.push(Item::Net(Net::reg("mem").with_range("WIDTH-1:0").with_depth("0:DEPTH-1")));
    m.push(Item::posedge(
        "clk",
        vec![
            Stmt::if_then(
                "we",
                vec![Stmt::non_blocking("mem[addr[12:3]]", "wdata")],
            ),
            Stmt::non_blocking("rdata", "mem[addr[12:3]]"),
        ],
    ));
    m
}

fn cached() -> Module {
    let mut m = common_ports(Module::new(module_name(MemoryInterface::Cached)))
        .with_parameter("LINES", CACHE_LINES.to_string())
        .with_parameter("WORDS_PER_LINE", WORDS_PER_LINE.to_string())
        .with_parameter("TAG_WIDTH", "55")
        .with_port(Port::input("reset"));
    m = data_ports(m, Port::output_bus("rdata", "WIDTH-1:0")).with_port(Port::output("hit"));

    m.push(Item::comment(format!(
        "Direct-mapped, write-through: {CACHE_LINES} lines x {WORDS_PER_LINE} words"
    )));
    m.push(Item::comment(
        "addr[63:9] tag, addr[8:5] line, addr[4:3] word",
    ));
    m.push(Item::Net(Net::reg("mem").with_range("WIDTH-1:0").with_depth("0:DEPTH-1")));
    m.push(Item::Net(
        Net::reg("cache_data")
            .with_range("WIDTH-1:0")
            .with_depth("0:LINES*WORDS_PER_LINE-1"),
    ));
    m.push(Item::Net(Net::reg("cache_tag").with_range("TAG_WIDTH-1:0").with_depth("0:LINES-1")));
    m.push(Item::Net(Net::reg("cache_valid").with_depth("0:LINES-1")));
    m.push(Item::Net(Net::integer("i")));
    m.push(Item::Net(Net::wire("line").with_range("3:0")));
    m.push(Item::Net(Net::wire("word").with_range("1:0")));
    m.push(Item::Net(Net::wire("tag").with_range("TAG_WIDTH-1:0")));
    m.push(Item::Net(Net::wire("mem_index").with_range("9:0")));
    m.push(Item::Net(Net::wire("line_base").with_range("9:0")));
    m.push(Item::assign("line", "addr[8:5]"));
    m.push(Item::assign("word", "addr[4:3]"));
    m.push(Item::assign("tag", "addr[63:9]"));
    m.push(Item::assign("mem_index", "addr[12:3]"));
    m.push(Item::assign("line_base", "{addr[12:5], 2'b00}"));
    m.push(Item::assign("hit", "cache_valid[line] && cache_tag[line] == tag"));
    m.push(Item::assign(
        "rdata",
        "hit ? cache_data[{line, word}] : mem[mem_index]",
    ));

    m.push(Item::posedge(
        "clk",
        vec![Stmt::if_else(
            "reset",
            vec![Stmt::count_loop(
                "i",
                "LINES",
                vec![Stmt::non_blocking("cache_valid[i]", "1'b0")],
            )],
            vec![Stmt::if_else(
                "we",
                vec![
                    Stmt::non_blocking("mem[mem_index]", "wdata"),
                    Stmt::if_then(
                        "hit",
                        vec![Stmt::non_blocking("cache_data[{line, word}]", "wdata")],
                    ),
                ],
                vec![Stmt::if_then(
                    "!hit",
                    vec![
                        Stmt::Comment("refill the whole line".into()),
                        Stmt::count_loop(
                            "i",
                            "WORDS_PER_LINE",
                            vec![Stmt::non_blocking(
                                "cache_data[{line, 2'b00} + i]",
                                "mem[line_base + i]",
                            )],
                        ),
                        Stmt::non_blocking("cache_tag[line]", "tag"),
                        Stmt::non_blocking("cache_valid[line]", "1'b1"),
                    ],
                )],
            )],
        )],
    ));
    m
}
