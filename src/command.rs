//! The little command language the repl speaks.

use cellgc::Address;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `alloc <root>`
    Alloc(Address),
    /// `get <addr>`
    Get(Address),
    /// `set <addr> <first> <second>`
    Set(Address, Address, Address),
    /// `first <addr> <value>`
    First(Address, Address),
    /// `second <addr> <value>`
    Second(Address, Address),
    /// `gc <root>`
    Collect(Address),
    /// `mark <root>`
    Mark(Address),
    /// `print <root>`
    Print(Address),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Input closed")]
    Eof,
    #[error("unknown command {:?}", .0)]
    UnknownCmd(String),
    #[error("expected an address (a number, or nil) but found {:?}", .0)]
    NotAnAddress(String),
    #[error("{} takes {} arguments, found extra {:?}", .0, .1, .2)]
    TooMany(&'static str, usize, String),
}

pub struct Parser<S, I: Iterator<Item = S>> {
    tokens: I,
}

impl<S, I: Iterator<Item = S>> Parser<S, I>
where
    S: std::ops::Deref<Target = str>,
{
    pub fn new(tokens: I) -> Parser<S, I> {
        Parser { tokens }
    }

    pub fn parse_cmd(&mut self) -> Result<Command, ParsingError> {
        use Command::*;
        let head = self.tokens.next().ok_or(ParsingError::Eof)?;
        let (name, cmd) = match &*head.to_ascii_lowercase() {
            "alloc" => ("alloc", Alloc(self.address()?)),
            "get" => ("get", Get(self.address()?)),
            "set" => ("set", Set(self.address()?, self.address()?, self.address()?)),
            "first" => ("first", First(self.address()?, self.address()?)),
            "second" => ("second", Second(self.address()?, self.address()?)),
            "gc" => ("gc", Collect(self.address()?)),
            "mark" => ("mark", Mark(self.address()?)),
            "print" => ("print", Print(self.address()?)),
            other => return Err(ParsingError::UnknownCmd(other.to_owned())),
        };
        match self.tokens.next() {
            None => Ok(cmd),
            Some(extra) => Err(ParsingError::TooMany(name, arity(&cmd), String::from(&*extra))),
        }
    }

    /// Parse an address out of a token. `0` and `nil` are both null.
    fn address(&mut self) -> Result<Address, ParsingError> {
        let tok = self.tokens.next().ok_or(ParsingError::Eof)?;
        match &*tok.to_ascii_lowercase() {
            "nil" => Ok(Address::NULL),
            s => s
                .parse::<usize>()
                .map(Address::new)
                .map_err(|_| ParsingError::NotAnAddress(s.to_owned())),
        }
    }
}

fn arity(cmd: &Command) -> usize {
    use Command::*;
    match cmd {
        Alloc(_) | Get(_) | Collect(_) | Mark(_) | Print(_) => 1,
        First(..) | Second(..) => 2,
        Set(..) => 3,
    }
}

pub fn cmd(s: &str) -> Result<Command, ParsingError> {
    Parser::new(s.split_ascii_whitespace()).parse_cmd()
}

#[cfg(test)]
mod tests {
    use super::*;
    use Command::*;

    fn a(n: usize) -> Address {
        Address::new(n)
    }

    #[test]
    fn parses_every_command() {
        let cases = vec![
            ("alloc nil", Alloc(Address::NULL)),
            ("alloc 0", Alloc(Address::NULL)),
            ("ALLOC 3", Alloc(a(3))),
            ("get 1", Get(a(1))),
            ("set 1 2 nil", Set(a(1), a(2), Address::NULL)),
            ("first 1 2", First(a(1), a(2))),
            ("second 4 0", Second(a(4), Address::NULL)),
            ("gc 1", Collect(a(1))),
            ("mark 2", Mark(a(2))),
            ("  print   1 ", Print(a(1))),
        ];
        for (input, expected) in cases {
            assert_eq!(cmd(input), Ok(expected), "parsing {:?}", input);
        }
    }

    #[test]
    fn rejects_junk() {
        assert_eq!(cmd(""), Err(ParsingError::Eof));
        assert_eq!(cmd("set 1 2"), Err(ParsingError::Eof));
        assert_eq!(cmd("frob 1"), Err(ParsingError::UnknownCmd("frob".into())));
        assert_eq!(
            cmd("get x"),
            Err(ParsingError::NotAnAddress("x".into()))
        );
        assert_eq!(
            cmd("get -1"),
            Err(ParsingError::NotAnAddress("-1".into()))
        );
        assert_eq!(
            cmd("gc 1 2"),
            Err(ParsingError::TooMany("gc", 1, "2".into()))
        );
    }
}
