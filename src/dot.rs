//! Reading and writing automata in (a subset of) the graphviz DOT language.
//!
//! An automaton is described as a directed graph. Nodes with `shape=point` are entry pointers:
//! an edge from such a node marks its target as the initial state. Nodes with
//! `shape=doublecircle` are accepting. Every other edge is a transition whose `label` lists one
//! or more comma separated entries. An entry is
//! - `_`, `λ` or `ε` for an epsilon transition,
//! - a single character for that symbol,
//! - a character in single quotes (`'_'`, `','`, `' '`) for that symbol, which is how the
//!   epsilon markers, the comma, the quote and whitespace are written as symbols.
//!
//! The graph attribute `alphabet` lists additional symbols in the same syntax, so symbols that
//! occur on no transition are not lost.
//!
//! ```text
//! digraph {
//!     alphabet="a,b";
//!     inic [shape=point];
//!     inic -> q0;
//!     q1 [shape=doublecircle];
//!     q0 -> q1 [label="a"];
//!     q1 -> q0 [label="_"];
//! }
//! ```
//!
//! Other graph attributes (`rankdir=LR`) and default attribute statements (`node [...]`,
//! `edge [...]`, `graph [...]`) are accepted and ignored, as are `//` line comments. Identifiers
//! are either plain (letters, digits, `_` and `'`) or double quoted, where `\"` and `\\` are
//! escapes for a quote and a backslash.
use itertools::Itertools;
use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, is_not, tag, take_while1},
    character::complete::{anychar, char, multispace0, multispace1, not_line_ending, satisfy},
    combinator::{all_consuming, map, opt, value},
    multi::{many0, separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
    IResult,
};
use thiserror::Error;
use tracing::{trace, warn};

use crate::{math::Set, prelude::*};

/// Errors that can occur while reading an automaton from its DOT description.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum DotError {
    /// The input is not a well-formed graph.
    #[error("malformed dot input: {0}")]
    Syntax(String),
    /// An edge between two states has no `label` attribute.
    #[error("transition from {from} to {to} has no label")]
    MissingLabel {
        /// Name of the source state.
        from: String,
        /// Name of the target state.
        to: String,
    },
    /// A label is not a comma separated list of symbols and epsilon markers, or the alphabet
    /// attribute contains epsilon.
    #[error("{0:?} is not a valid list of symbols")]
    InvalidLabel(String),
    /// The states and transitions do not form a valid automaton.
    #[error(transparent)]
    Automaton(#[from] AutomatonError),
}

/// The components of an automaton as read from a DOT description. They can be turned into
/// either kind of automaton, validation happens at that point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotAutomaton {
    /// The name of the graph, if one was given.
    pub name: Option<String>,
    /// The states in order of their first appearance.
    pub states: StateSet,
    /// The symbols of the `alphabet` attribute together with all symbols on transitions.
    pub alphabet: Alphabet,
    /// The transitions in order of appearance.
    pub transitions: Vec<Transition>,
}

impl DotAutomaton {
    /// Builds a [`DFA`] from the components.
    pub fn into_dfa(self) -> Result<DFA, DotError> {
        Ok(DFA::new(self.states, self.alphabet, self.transitions)?)
    }

    /// Builds an [`EpsilonNFA`] from the components.
    pub fn into_nfa(self) -> Result<EpsilonNFA, DotError> {
        Ok(EpsilonNFA::new(self.states, self.alphabet, self.transitions)?)
    }
}

type Attributes<'a> = Vec<(&'a str, String)>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Statement<'a> {
    Assignment(&'a str, String),
    Node {
        id: String,
        attributes: Attributes<'a>,
    },
    Edge {
        from: String,
        to: String,
        attributes: Attributes<'a>,
    },
    Ignored,
}

fn attribute<'s>(attributes: &'s [(&str, String)], key: &str) -> Option<&'s str> {
    attributes
        .iter()
        .find_map(|(k, v)| (*k == key).then_some(v.as_str()))
}

fn has_shape(attributes: &[(&str, String)], shape: &str) -> bool {
    attribute(attributes, "shape") == Some(shape)
}

/// Whitespace and `//` comments.
fn sp(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((multispace1, preceded(tag("//"), not_line_ending)))),
    )(input)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\''
}

fn plain_ident(input: &str) -> IResult<&str, &str> {
    take_while1(is_ident_char)(input)
}

fn quoted(input: &str) -> IResult<&str, String> {
    let content = escaped_transform(
        is_not("\\\""),
        '\\',
        alt((value("\\", tag("\\")), value("\"", tag("\"")))),
    );
    delimited(
        char('"'),
        map(opt(content), Option::unwrap_or_default),
        char('"'),
    )(input)
}

fn ident(input: &str) -> IResult<&str, String> {
    alt((quoted, map(plain_ident, str::to_string)))(input)
}

fn assignment(input: &str) -> IResult<&str, (&str, String)> {
    separated_pair(plain_ident, tuple((sp, char('='), sp)), ident)(input)
}

fn attribute_list(input: &str) -> IResult<&str, Attributes<'_>> {
    delimited(
        pair(char('['), sp),
        separated_list0(tuple((sp, alt((char(','), char(';'))), sp)), assignment),
        pair(sp, char(']')),
    )(input)
}

/// `node [...]`, `edge [...]` and `graph [...]`. Only the plain keywords count, a quoted
/// `"node"` is an ordinary node.
fn default_attributes(input: &str) -> IResult<&str, Statement<'_>> {
    value(
        Statement::Ignored,
        tuple((
            alt((tag("node"), tag("edge"), tag("graph"))),
            sp,
            attribute_list,
        )),
    )(input)
}

fn node_or_edge(input: &str) -> IResult<&str, Statement<'_>> {
    let (input, from) = terminated(ident, sp)(input)?;
    let (input, to) = opt(terminated(preceded(pair(tag("->"), sp), ident), sp))(input)?;
    let (input, attributes) = opt(attribute_list)(input)?;
    let attributes = attributes.unwrap_or_default();

    let statement = match to {
        Some(to) => Statement::Edge {
            from,
            to,
            attributes,
        },
        None => Statement::Node {
            id: from,
            attributes,
        },
    };
    Ok((input, statement))
}

fn statement(input: &str) -> IResult<&str, Statement<'_>> {
    alt((
        map(assignment, |(key, value)| Statement::Assignment(key, value)),
        default_attributes,
        node_or_edge,
    ))(input)
}

fn graph(input: &str) -> IResult<&str, (Option<String>, Vec<Statement<'_>>)> {
    let body = many0(terminated(statement, tuple((sp, opt(char(';')), sp))));
    all_consuming(delimited(
        sp,
        pair(
            preceded(pair(tag("digraph"), sp), opt(terminated(ident, sp))),
            delimited(pair(char('{'), sp), body, char('}')),
        ),
        sp,
    ))(input)
}

fn label_entry(input: &str) -> IResult<&str, Label> {
    alt((
        map(delimited(char('\''), anychar, char('\'')), Label::Symbol),
        value(Label::Epsilon, alt((tag("_"), tag("λ"), tag("ε")))),
        map(
            satisfy(|c| c != ',' && c != '\'' && !c.is_whitespace()),
            Label::Symbol,
        ),
    ))(input)
}

fn parse_label(raw: &str) -> Result<Vec<Label>, DotError> {
    all_consuming(delimited(
        multispace0,
        separated_list1(tuple((multispace0, char(','), multispace0)), label_entry),
        multispace0,
    ))(raw)
    .map(|(_, labels)| labels)
    .map_err(|_| DotError::InvalidLabel(raw.to_string()))
}

/// Reads the components of an automaton from `input`.
pub fn parse_dot(input: &str) -> Result<DotAutomaton, DotError> {
    let (_, (name, statements)) = graph(input).map_err(|e| {
        DotError::Syntax(
            e.map_input(|rest: &str| rest.chars().take(24).collect::<String>())
                .to_string(),
        )
    })?;

    let pointers: Set<&str> = statements
        .iter()
        .filter_map(|statement| match statement {
            Statement::Node { id, attributes } if has_shape(attributes, "point") => {
                Some(id.as_str())
            }
            _ => None,
        })
        .collect();

    let mut names: Vec<&str> = vec![];
    let mut accepting: Set<&str> = Set::default();
    let mut initial: Set<&str> = Set::default();
    let mut used_pointers: Set<&str> = Set::default();
    let mut transitions = vec![];
    let mut alphabet = Alphabet::new();

    for statement in &statements {
        match statement {
            Statement::Assignment("alphabet", raw) => {
                for label in parse_label(raw)? {
                    let sym = label
                        .symbol()
                        .ok_or_else(|| DotError::InvalidLabel(raw.clone()))?;
                    alphabet.add_symbol(sym);
                }
            }
            Statement::Node { id, attributes } if !pointers.contains(id.as_str()) => {
                names.push(id);
                if has_shape(attributes, "doublecircle") {
                    accepting.insert(id);
                }
            }
            Statement::Edge { from, to, .. } if pointers.contains(from.as_str()) => {
                used_pointers.insert(from);
                initial.insert(to);
                names.push(to);
            }
            Statement::Edge {
                from,
                to,
                attributes,
            } => {
                names.extend([from.as_str(), to.as_str()]);
                let raw = attribute(attributes, "label").ok_or_else(|| DotError::MissingLabel {
                    from: from.clone(),
                    to: to.clone(),
                })?;
                for label in parse_label(raw)? {
                    if let Some(sym) = label.symbol() {
                        alphabet.add_symbol(sym);
                    }
                    transitions.push(Transition::new(from.as_str(), label, to.as_str()));
                }
            }
            _ => {}
        }
    }

    for pointer in pointers.difference(&used_pointers) {
        warn!("entry pointer {pointer} does not point to any state");
    }

    let states = StateSet::from_states(names.into_iter().unique().map(|name| {
        State::new(name, initial.contains(name), accepting.contains(name))
    }))?;
    trace!(
        "read {} states and {} transitions from dot input",
        states.len(),
        transitions.len()
    );

    Ok(DotAutomaton {
        name,
        states,
        alphabet,
        transitions,
    })
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

fn dot_ident(name: &str) -> String {
    let keyword = matches!(name, "node" | "edge" | "graph");
    if !keyword && !name.is_empty() && name.chars().all(is_ident_char) {
        name.to_string()
    } else {
        quote(name)
    }
}

fn label_entry_text(label: Label) -> String {
    match label {
        Label::Epsilon => "_".to_string(),
        Label::Symbol(sym) if sym.is_whitespace() || matches!(sym, '_' | 'λ' | 'ε' | ',' | '\'') => {
            format!("'{sym}'")
        }
        Label::Symbol(sym) => sym.to_string(),
    }
}

/// Types that can be written as a DOT graph which [`parse_dot`] reads back into an equal
/// automaton: same state names in the same order, same flags, same alphabet and same
/// transitions.
pub trait Dottable {
    /// Compute the graphviz representation, for more information on the DOT format,
    /// see the [graphviz documentation](https://graphviz.org/doc/info/lang.html).
    fn dot_representation(&self) -> String;

    /// Lays out the graph with the `dot` executable and returns its output in the given
    /// `format`, for example `"svg"` or `"png"`. Fails if `dot` cannot be started or rejects
    /// the input, in the latter case the error carries what `dot` wrote to stderr.
    #[cfg(feature = "graphviz")]
    fn render(&self, format: &str) -> Result<Vec<u8>, std::io::Error> {
        use std::io::{Error, ErrorKind, Write};
        use std::process::{Command, Stdio};

        let mut child = Command::new("dot")
            .arg(format!("-T{format}"))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        child
            .stdin
            .take()
            .ok_or_else(|| Error::new(ErrorKind::BrokenPipe, "stdin of dot is not piped"))?
            .write_all(self.dot_representation().as_bytes())?;

        let output = child.wait_with_output()?;
        trace!("dot produced {} bytes of {format}", output.stdout.len());
        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(Error::new(
                ErrorKind::Other,
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ))
        }
    }
}

impl<const DET: bool> Dottable for FiniteAutomaton<DET>
where
    FiniteAutomaton<DET>: Automaton,
{
    fn dot_representation(&self) -> String {
        let states = self.states();
        let pointer = states.fresh_name("init");

        let header = ["digraph A {".to_string()].into_iter();
        let alphabet = (!self.alphabet().is_empty()).then(|| {
            let symbols = self
                .alphabet()
                .iter()
                .map(|sym| label_entry_text(Label::Symbol(sym)))
                .join(",");
            format!("  alphabet={}", quote(&symbols))
        });
        let entry = self.initial_state().into_iter().flat_map(|(_, q)| {
            [
                format!("  {pointer} [shape=point]"),
                format!("  {pointer} -> {}", dot_ident(q.name())),
            ]
        });
        let nodes = states.iter().map(|(_, q)| {
            format!(
                "  {} [shape={}]",
                dot_ident(q.name()),
                if q.is_accepting() {
                    "doublecircle"
                } else {
                    "circle"
                }
            )
        });
        let edges = self.transition_triples().into_iter().map(|t| {
            format!(
                "  {} -> {} [label={}]",
                dot_ident(&t.source),
                dot_ident(&t.target),
                quote(&label_entry_text(t.label))
            )
        });

        header
            .chain(alphabet)
            .chain(entry)
            .chain(nodes)
            .chain(edges)
            .chain(std::iter::once("}".to_string()))
            .join("\n")
    }
}
