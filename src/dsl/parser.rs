//! Parser for circuit definitions.
//!
//! A single top-to-bottom pass over three sections:
//!
//! ```text
//! file    = section(DEVICES) section(CONNECTIONS) [section(MONITOR)] EOF
//! section = KEYWORD ':' item { ',' item } ';'
//! ```
//!
//! Items are handed to the builder as soon as they are complete. On a syntax
//! error the parser reports it and skips forward to the next place it can
//! resume (an item, a section or the end of input); nothing aborts the parse.

use tracing::debug;

use super::builder::CircuitBuilder;
use super::diagnostics::{
    Anchor, DiagnosticSink, ErrorKind, Location, Reporter, SemanticError, SyntaxError,
};
use super::items::{ConnectionItem, DeviceItem, MonitorItem, PortDirection, PortRef, Section};
use super::lexer::{Keywords, Lexer, Token, TokenKind};
use super::names::SymbolId;
use crate::error::DeviceError;

/// The current token and the one consumed just before it.
struct Cursor<'a> {
    lexer: Lexer<'a>,
    current: Token,
    previous: Option<Token>,
}

impl<'a> Cursor<'a> {
    fn new(mut lexer: Lexer<'a>) -> Self {
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            previous: None,
        }
    }

    fn kind(&self) -> TokenKind {
        self.current.kind
    }

    fn current(&self) -> &Token {
        &self.current
    }

    /// Falls back to the current token before anything has been consumed.
    fn previous(&self) -> &Token {
        self.previous.as_ref().unwrap_or(&self.current)
    }

    fn keywords(&self) -> &Keywords {
        self.lexer.keywords()
    }

    fn source(&self) -> &'a str {
        self.lexer.source()
    }

    fn at_eof(&self) -> bool {
        self.current.kind == TokenKind::Eof
    }

    fn at_section(&self, section: Section) -> bool {
        self.section_keyword() == Some(section)
    }

    fn section_keyword(&self) -> Option<Section> {
        match self.current.kind {
            TokenKind::Keyword(id) => self.keywords().section(id),
            _ => None,
        }
    }

    fn advance(&mut self) {
        let next = self.lexer.next_token();
        self.previous = Some(std::mem::replace(&mut self.current, next));
    }

    /// Discard tokens until `stop` accepts the current one or the input ends.
    fn skip_until(&mut self, stop: impl Fn(&Keywords, TokenKind) -> bool) {
        let mut skipped = 0usize;
        while !self.at_eof() && !stop(self.keywords(), self.current.kind) {
            self.advance();
            skipped += 1;
        }
        debug!(
            skipped,
            line = self.current.line,
            stop = ?self.current.kind,
            "resynchronised"
        );
    }
}

fn is_section_keyword(keywords: &Keywords, kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Keyword(id) if keywords.section(id).is_some())
}

/// Where the next list item, or the end of the list, may start.
fn at_item_boundary(keywords: &Keywords, kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Comma | TokenKind::Semicolon) || is_section_keyword(keywords, kind)
}

fn at_section_boundary(keywords: &Keywords, kind: TokenKind) -> bool {
    kind == TokenKind::Semicolon || is_section_keyword(keywords, kind)
}

fn missing_header(section: Section) -> SyntaxError {
    match section {
        Section::Devices => SyntaxError::MissingDeviceKeyword,
        Section::Connections => SyntaxError::MissingConnectionsKeyword,
        Section::Monitor => SyntaxError::MissingMonitorKeyword,
    }
}

/// How far an item got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Item {
    /// Every token of the item was present, whether or not the builder
    /// accepted it.
    Complete,
    /// A syntax error was reported; the cursor is still inside the item.
    Failed,
}

/// Result of parsing one `device[.port]` reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reference {
    Resolved(PortRef),
    /// Shaped well enough to carry on, but the port was already reported.
    Rejected,
    Failed,
}

/// Parser for circuit definitions.
pub struct Parser<'b, B, S> {
    builder: &'b mut B,
    reporter: Reporter<S>,
}

impl<'b, B: CircuitBuilder, S: DiagnosticSink> Parser<'b, B, S> {
    /// Create a parser feeding `builder` and streaming diagnostics to `sink`.
    pub fn new(builder: &'b mut B, sink: S) -> Self {
        Self {
            builder,
            reporter: Reporter::new(sink),
        }
    }

    /// Parse a whole definition. Returns `true` if no error was found.
    ///
    /// `true` only means the definition is well formed and every item was
    /// accepted by the builder, not that the circuit can be simulated.
    pub fn parse(&mut self, lexer: Lexer<'_>) -> bool {
        let mut cur = Cursor::new(lexer);

        self.parse_section(&mut cur, Section::Devices);
        self.parse_section(&mut cur, Section::Connections);

        if !self.builder.check_network() {
            self.error(
                &cur,
                SemanticError::NotAllInputsConnected.into(),
                Anchor::Unplaced,
            );
        }

        if cur.at_section(Section::Monitor) {
            self.parse_section(&mut cur, Section::Monitor);
        } else if !cur.at_eof() {
            self.error(&cur, SyntaxError::MissingMonitorKeyword.into(), Anchor::Current);
            cur.skip_until(|_, _| false);
        }

        if !cur.at_eof() {
            self.error(&cur, SyntaxError::UnexpectedSymbol.into(), Anchor::Current);
            cur.skip_until(|_, _| false);
        }

        debug!(errors = self.reporter.error_count(), "parse finished");
        self.reporter.error_count() == 0
    }

    /// Number of errors counted so far.
    pub fn error_count(&self) -> usize {
        self.reporter.error_count()
    }

    /// Report `kind` at the token picked by `anchor`.
    ///
    /// Hitting the end of input while something was still expected is a
    /// premature end of file, whatever the caller was looking for.
    fn error(&mut self, cur: &Cursor<'_>, kind: ErrorKind, anchor: Anchor) {
        if cur.at_eof() && (kind.is_syntax() || anchor == Anchor::Current) {
            self.reporter.premature_eof();
            return;
        }
        let token = match anchor {
            Anchor::Current => Some(cur.current()),
            Anchor::Previous => Some(cur.previous()),
            Anchor::Unplaced => None,
        };
        let location = token.map(|token| Location::of(cur.source(), token));
        self.reporter.report(kind, location);
    }

    fn parse_section(&mut self, cur: &mut Cursor<'_>, section: Section) {
        debug!(?section, line = cur.current().line, "section");

        if !cur.at_section(section) {
            self.error(cur, missing_header(section).into(), Anchor::Current);
            let next = section.next();
            cur.skip_until(|keywords, kind| {
                kind == TokenKind::Semicolon
                    || matches!(kind, TokenKind::Keyword(id)
                        if keywords.section_id(section) == id
                            || next.is_some_and(|next| keywords.section_id(next) == id))
            });
            if cur.kind() == TokenKind::Semicolon {
                cur.advance();
            }
            // Stray tokens before the header: the section itself is still there.
            if !cur.at_section(section) {
                return;
            }
        }
        cur.advance();

        if cur.kind() == TokenKind::Colon {
            cur.advance();
        } else {
            self.error(cur, SyntaxError::MissingColon.into(), Anchor::Previous);
            cur.skip_until(at_section_boundary);
            if cur.kind() == TokenKind::Semicolon {
                cur.advance();
            }
            return;
        }

        self.parse_list(cur, section);
    }

    /// `item { ',' item } ';'`
    fn parse_list(&mut self, cur: &mut Cursor<'_>, section: Section) {
        loop {
            let mut outcome = self.parse_item(cur, section);
            if outcome == Item::Failed {
                cur.skip_until(at_item_boundary);
            }

            loop {
                match cur.kind() {
                    TokenKind::Comma => {
                        cur.advance();
                        if cur.section_keyword().is_some() {
                            self.error(cur, SyntaxError::CommaNotSemicolon.into(), Anchor::Previous);
                            return;
                        }
                        break;
                    }
                    TokenKind::Semicolon => {
                        cur.advance();
                        return;
                    }
                    TokenKind::Eof => {
                        self.error(cur, SyntaxError::MissingSemicolon.into(), Anchor::Current);
                        return;
                    }
                    _ if cur.section_keyword().is_some() => {
                        if outcome == Item::Complete {
                            self.error(cur, SyntaxError::MissingSemicolon.into(), Anchor::Previous);
                        }
                        return;
                    }
                    TokenKind::Keyword(_) | TokenKind::Name(_) => {
                        // Looks like the next item; only the comma is missing.
                        self.error(cur, SyntaxError::MissingDelimiter.into(), Anchor::Current);
                        break;
                    }
                    _ => {
                        self.error(cur, SyntaxError::MissingDelimiter.into(), Anchor::Current);
                        cur.advance();
                        cur.skip_until(at_item_boundary);
                        outcome = Item::Failed;
                    }
                }
            }
        }
    }

    fn parse_item(&mut self, cur: &mut Cursor<'_>, section: Section) -> Item {
        match section {
            Section::Devices => self.parse_device(cur),
            Section::Connections => self.parse_connection(cur),
            Section::Monitor => self.parse_monitor(cur),
        }
    }

    /// `<kind> <name> [<number>]`
    fn parse_device(&mut self, cur: &mut Cursor<'_>) -> Item {
        let kind = match cur.kind() {
            TokenKind::Keyword(id) if cur.keywords().is_device_kind(id) => id,
            _ => {
                self.error(cur, DeviceError::BadDeviceKind.into(), Anchor::Current);
                return Item::Failed;
            }
        };
        cur.advance();

        let Some(name) = self.expect_name(cur) else {
            return Item::Failed;
        };

        let parameter = match cur.kind() {
            TokenKind::Number(value) => {
                cur.advance();
                Some(value)
            }
            _ => None,
        };

        let item = DeviceItem {
            kind,
            name,
            parameter,
        };
        debug!(?item, "device");
        if let Err(err) = self.builder.make_device(item.name, item.kind, item.parameter) {
            self.error(cur, err.into(), Anchor::Previous);
        }
        Item::Complete
    }

    /// `<device>[.<port>] -> <device>[.<port>]`
    fn parse_connection(&mut self, cur: &mut Cursor<'_>) -> Item {
        let source = self.parse_reference(cur, PortDirection::Output);
        if source == Reference::Failed {
            return Item::Failed;
        }

        if cur.kind() != TokenKind::Arrow {
            self.error(cur, SyntaxError::MissingArrow.into(), Anchor::Current);
            return Item::Failed;
        }
        cur.advance();

        let target = self.parse_reference(cur, PortDirection::Input);
        if target == Reference::Failed {
            return Item::Failed;
        }

        if let (Reference::Resolved(source), Reference::Resolved(target)) = (source, target) {
            let item = ConnectionItem { source, target };
            debug!(?item, "connection");
            let result = self.builder.make_connection(
                item.source.device,
                item.source.port,
                item.target.device,
                item.target.port,
            );
            if let Err(err) = result {
                self.error(cur, err.into(), Anchor::Previous);
            }
        }
        Item::Complete
    }

    /// `<device>[.<port>]`
    fn parse_monitor(&mut self, cur: &mut Cursor<'_>) -> Item {
        match self.parse_reference(cur, PortDirection::Output) {
            Reference::Failed => Item::Failed,
            Reference::Rejected => Item::Complete,
            Reference::Resolved(port) => {
                let item = MonitorItem { port };
                debug!(?item, "monitor");
                if let Err(err) = self.builder.make_monitor(item.port.device, item.port.port) {
                    self.error(cur, err.into(), Anchor::Previous);
                }
                Item::Complete
            }
        }
    }

    fn expect_name(&mut self, cur: &mut Cursor<'_>) -> Option<SymbolId> {
        match cur.kind() {
            TokenKind::Name(id) => {
                cur.advance();
                Some(id)
            }
            _ => {
                self.error(cur, SyntaxError::InvalidDeviceName.into(), Anchor::Current);
                None
            }
        }
    }

    /// `<device>[.<port>]`, checking the port against the device's declared
    /// ports when the device is already known.
    fn parse_reference(&mut self, cur: &mut Cursor<'_>, direction: PortDirection) -> Reference {
        let Some(device) = self.expect_name(cur) else {
            return Reference::Failed;
        };
        if cur.kind() != TokenKind::Dot {
            return Reference::Resolved(PortRef::new(device, None));
        }
        cur.advance();

        let wrong_port: ErrorKind = match direction {
            PortDirection::Input => SemanticError::InvalidInput,
            PortDirection::Output => SemanticError::InvalidOutput,
        }
        .into();

        match cur.kind() {
            TokenKind::Name(port) => {
                let declared = self.builder.get_device(device).map(|ports| match direction {
                    PortDirection::Input => ports.has_input(port),
                    PortDirection::Output => ports.has_output(port),
                });
                if declared == Some(false) {
                    self.error(cur, wrong_port, Anchor::Current);
                    cur.advance();
                    return Reference::Rejected;
                }
                cur.advance();
                Reference::Resolved(PortRef::new(device, Some(port)))
            }
            TokenKind::Comma | TokenKind::Semicolon | TokenKind::Arrow | TokenKind::Eof => {
                self.error(cur, SyntaxError::PortMissing.into(), Anchor::Previous);
                Reference::Failed
            }
            _ if cur.section_keyword().is_some() => {
                self.error(cur, SyntaxError::PortMissing.into(), Anchor::Previous);
                Reference::Failed
            }
            _ => {
                self.error(cur, wrong_port, Anchor::Current);
                cur.advance();
                Reference::Rejected
            }
        }
    }
}
