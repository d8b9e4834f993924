//! RcDoc-based pretty-printer with termcolor annotations for [`Term`].
//!
//! Role
//! - Convert a term into an annotated document in infix notation with the minimal
//!   parentheses needed to preserve the tree shape (`x + 5`, `(a + b) * c`, `a - (b - c)`).
//! - Provide colored output for terminals (TTY-aware) and plain strings for logs/tests.
//!   [`Display`](std::fmt::Display) renders the plain form.
use std::io::{self, Write};

use pretty::{FmtWrite, RcDoc, RenderAnnotated};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::term::{BinaryOperator, Node, Term};

/// Styles used to annotate parts of the pretty-printed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Punct, // commas, brackets
    /// Parentheses are colored by nesting depth so matching pairs share a color.
    Paren(u8),
    Keyword,  // sum
    Operator, // +, -, *
    Ident,    // variables, arrays, functions
    Literal,  // integer constants
}

impl Style {
    fn to_color_spec(self) -> ColorSpec {
        let mut s = ColorSpec::new();
        match self {
            Style::Punct => {
                s.set_dimmed(true);
            }
            Style::Paren(depth) => {
                let fg = match depth % 4 {
                    0 => Color::Blue,
                    1 => Color::Green,
                    2 => Color::Yellow,
                    3 => Color::Magenta,
                    _ => unreachable!(),
                };
                s.set_fg(Some(fg)).set_dimmed(true);
            }
            Style::Keyword => {
                s.set_fg(Some(Color::Cyan)).set_bold(true);
            }
            Style::Operator => {
                s.set_fg(Some(Color::Yellow)).set_bold(true);
            }
            Style::Ident => {
                s.set_fg(Some(Color::Green)).set_bold(true);
            }
            Style::Literal => {
                s.set_fg(Some(Color::Magenta));
            }
        }
        s
    }
}

fn punct(s: &'static str) -> RcDoc<'static, Style> {
    RcDoc::as_string(s).annotate(Style::Punct)
}

fn lparen(depth: u8) -> RcDoc<'static, Style> {
    RcDoc::as_string("(").annotate(Style::Paren(depth))
}

fn rparen(depth: u8) -> RcDoc<'static, Style> {
    RcDoc::as_string(")").annotate(Style::Paren(depth))
}

fn ident(name: &str) -> RcDoc<'static, Style> {
    RcDoc::as_string(name.to_string()).annotate(Style::Ident)
}

fn op(operator: BinaryOperator) -> RcDoc<'static, Style> {
    RcDoc::as_string(operator.to_string()).annotate(Style::Operator)
}

/// Binding strength of the root of `term`; atoms bind tightest.
fn precedence(term: &Term) -> u8 {
    match term.node() {
        Node::Binary { op, .. } | Node::Linear { op, .. } => op.precedence(),
        _ => u8::MAX,
    }
}

/// Operand of an infix node. The first operand keeps left-associative chains bare; later
/// operands also take parentheses at equal precedence.
fn operand_doc(term: &Term, parent: BinaryOperator, first: bool, depth: u8) -> RcDoc<'static, Style> {
    let child = precedence(term);
    let need = child < parent.precedence() || (!first && child == parent.precedence());
    if need {
        lparen(depth)
            .append(to_doc_with_depth(term, depth + 1))
            .append(rparen(depth))
            .group()
    } else {
        to_doc_with_depth(term, depth)
    }
}

fn infix_doc<'t>(
    operator: BinaryOperator,
    operands: impl IntoIterator<Item = &'t Term>,
    depth: u8,
) -> RcDoc<'static, Style> {
    let mut doc = RcDoc::nil();
    for (i, operand) in operands.into_iter().enumerate() {
        if i > 0 {
            doc = doc
                .append(RcDoc::space())
                .append(op(operator))
                .append(RcDoc::space());
        }
        doc = doc.append(operand_doc(operand, operator, i == 0, depth));
    }
    doc.group()
}

fn to_doc_with_depth(term: &Term, depth: u8) -> RcDoc<'static, Style> {
    match term.node() {
        Node::Constant(value) => RcDoc::as_string(value).annotate(Style::Literal),
        Node::Variable(name) => ident(name),
        Node::ArrayVariable { name, index } => ident(name)
            .append(punct("["))
            .append(to_doc_with_depth(index, depth))
            .append(punct("]"))
            .group(),
        Node::FunctionValue { name, argument } => ident(name)
            .append(lparen(depth))
            .append(to_doc_with_depth(argument, depth + 1))
            .append(rparen(depth))
            .group(),
        Node::Binary {
            op: operator,
            left,
            right,
        } => infix_doc(*operator, [&**left, &**right], depth),
        Node::Linear {
            op: operator,
            operands,
        } => infix_doc(*operator, operands, depth),
        Node::Summation {
            index,
            lower,
            upper,
            body,
        } => RcDoc::as_string("sum")
            .annotate(Style::Keyword)
            .append(lparen(depth))
            .append(ident(index))
            .append(punct(", "))
            .append(to_doc_with_depth(lower, depth + 1))
            .append(punct(", "))
            .append(to_doc_with_depth(upper, depth + 1))
            .append(punct(", "))
            .append(to_doc_with_depth(body, depth + 1))
            .append(rparen(depth))
            .group(),
    }
}

// A writer that maps Style annotations to termcolor ColorSpec on a WriteColor sink.
struct ColorWriter<'w, W: WriteColor + Write> {
    out: &'w mut W,
}

impl<'a, 'w, W: WriteColor + Write> RenderAnnotated<'a, Style> for ColorWriter<'w, W> {
    fn push_annotation(&mut self, ann: &'a Style) -> io::Result<()> {
        self.out.set_color(&ann.to_color_spec())
    }
    fn pop_annotation(&mut self) -> io::Result<()> {
        self.out.reset()
    }
}

impl<'w, W: WriteColor + Write> pretty::Render for ColorWriter<'w, W> {
    type Error = io::Error;
    fn write_str(&mut self, s: &str) -> io::Result<usize> {
        self.out.write_all(s.as_bytes())?;
        Ok(s.len())
    }
    fn write_str_all(&mut self, s: &str) -> io::Result<()> {
        self.out.write_all(s.as_bytes())
    }
    fn fail_doc(&self) -> Self::Error {
        io::Error::other("render failed")
    }
}

/// Retrieve the width of the terminal, or 80 if it cannot be determined.
fn terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Pretty-printing conveniences for terms.
pub trait PrettyTerm {
    /// Build an RcDoc representation with style annotations.
    fn pretty_doc(&self) -> RcDoc<'static, Style>;

    /// Render with colors to any termcolor writer at the given width.
    fn pretty_render_to<W: WriteColor + Write>(&self, width: usize, out: &mut W) -> io::Result<()>;

    /// Print to stdout with colors (TTY-aware), at auto-detected width (or 80 if not a TTY).
    fn pretty_print(&self) -> io::Result<()>;

    /// Format into a plain string (no colors).
    fn pretty_string(&self) -> String;
}

impl PrettyTerm for Term {
    #[inline]
    fn pretty_doc(&self) -> RcDoc<'static, Style> {
        to_doc_with_depth(self, 0)
    }

    fn pretty_render_to<W: WriteColor + Write>(&self, width: usize, out: &mut W) -> io::Result<()> {
        let mut cw = ColorWriter { out };
        self.pretty_doc().render_raw(width, &mut cw)
    }

    fn pretty_print(&self) -> io::Result<()> {
        let stdout = StandardStream::stdout(ColorChoice::Auto);
        let mut stdout = stdout.lock();
        self.pretty_render_to(terminal_width(), &mut stdout)
    }

    fn pretty_string(&self) -> String {
        let mut buf = String::new();
        let _ = self.pretty_doc().render_fmt(80, &mut buf);
        buf
    }
}

impl Term {
    /// Plain infix rendering, same as `to_string()`.
    pub fn to_display(&self) -> String {
        self.pretty_string()
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut w = FmtWrite::new(f);
        self.pretty_doc().render_raw(80, &mut w)
    }
}

#[cfg(test)]
mod tests {
    use crate::dtype::ValueType;
    use crate::term::func::*;

    #[test]
    fn parentheses_follow_the_tree_shape() {
        let (a, b, c) = (int("a"), int("b"), int("c"));
        let t = mul(add(a.clone(), b.clone()).unwrap(), c.clone()).unwrap();
        assert_eq!(t.to_string(), "(a + b) * c");

        let t = sub(a.clone(), sub(b.clone(), c.clone()).unwrap()).unwrap();
        assert_eq!(t.to_string(), "a - (b - c)");

        let t = sub(sub(a.clone(), b.clone()).unwrap(), c.clone()).unwrap();
        assert_eq!(t.to_string(), "a - b - c");

        let t = add(mul(constant(3), a).unwrap(), constant(-5)).unwrap();
        assert_eq!(t.to_string(), "3 * a + -5");
    }

    #[test]
    fn atoms_render_with_their_arguments() {
        let i = int("i");
        let elem = array("a", add(i.clone(), constant(1)).unwrap(), ValueType::Integer).unwrap();
        assert_eq!(elem.to_string(), "a[i + 1]");

        let s = sum("i", constant(0), nat("n"), elem).unwrap();
        assert_eq!(s.to_string(), "sum(i, 0, n, a[i + 1])");

        let f = apply("f", int("x"), ValueType::NaturalNumber);
        assert_eq!(f.to_display(), "f(x)");
    }
}
