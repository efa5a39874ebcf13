//! Line-oriented command scripts that drive a `SeqVec<i64>`.
//!
//! One command per line, arguments separated by whitespace, `#` starts a
//! comment. Positions are written as offsets from `begin()`.
//!
//! ```text
//! list 1 2 3
//! insert 1 99     # [1, 99, 2, 3]
//! erase 0         # [99, 2, 3]
//! print
//! ```

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use seqvec::SeqVec;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the sequence with `n` zeros.
    New(isize),
    /// Replace the sequence with a literal list.
    List(Vec<i64>),
    PushBack(i64),
    PushFront(i64),
    PopBack,
    PopFront,
    Insert { at: isize, value: i64 },
    InsertN { at: isize, count: usize, value: i64 },
    InsertList { at: isize, values: Vec<i64> },
    Erase(isize),
    EraseRange(isize, isize),
    At(usize),
    Front,
    Back,
    Resize(usize),
    Clear,
    Reverse,
    Slice(isize, isize),
    Print,
    Size,
    Capacity,
}

fn arg<T>(args: &[&str], index: usize, name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = args
        .get(index)
        .ok_or_else(|| anyhow!("missing argument <{name}>"))?;
    raw.parse()
        .with_context(|| format!("invalid <{name}>: {raw:?}"))
}

fn values(args: &[&str]) -> Result<Vec<i64>> {
    args.iter()
        .map(|raw| {
            raw.parse()
                .with_context(|| format!("invalid list value: {raw:?}"))
        })
        .collect()
}

fn expect_arity(name: &str, args: &[&str], arity: usize) -> Result<()> {
    if args.len() != arity {
        bail!("`{name}` takes {arity} argument(s), got {}", args.len());
    }
    Ok(())
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next().ok_or_else(|| anyhow!("empty command"))?;
        let args: Vec<&str> = tokens.collect();

        let fixed = |arity: usize| expect_arity(name, &args, arity);
        let cmd = match name {
            "new" => {
                fixed(1)?;
                Command::New(arg(&args, 0, "len")?)
            }
            "list" => Command::List(values(&args)?),
            "push_back" => {
                fixed(1)?;
                Command::PushBack(arg(&args, 0, "value")?)
            }
            "push_front" => {
                fixed(1)?;
                Command::PushFront(arg(&args, 0, "value")?)
            }
            "pop_back" => {
                fixed(0)?;
                Command::PopBack
            }
            "pop_front" => {
                fixed(0)?;
                Command::PopFront
            }
            "insert" => {
                fixed(2)?;
                Command::Insert {
                    at: arg(&args, 0, "at")?,
                    value: arg(&args, 1, "value")?,
                }
            }
            "insert_n" => {
                fixed(3)?;
                Command::InsertN {
                    at: arg(&args, 0, "at")?,
                    count: arg(&args, 1, "count")?,
                    value: arg(&args, 2, "value")?,
                }
            }
            "insert_list" => Command::InsertList {
                at: arg(&args, 0, "at")?,
                values: values(&args[1..])?,
            },
            "erase" => {
                fixed(1)?;
                Command::Erase(arg(&args, 0, "at")?)
            }
            "erase_range" => {
                fixed(2)?;
                Command::EraseRange(arg(&args, 0, "first")?, arg(&args, 1, "last")?)
            }
            "at" => {
                fixed(1)?;
                Command::At(arg(&args, 0, "index")?)
            }
            "front" => {
                fixed(0)?;
                Command::Front
            }
            "back" => {
                fixed(0)?;
                Command::Back
            }
            "resize" => {
                fixed(1)?;
                Command::Resize(arg(&args, 0, "len")?)
            }
            "clear" => {
                fixed(0)?;
                Command::Clear
            }
            "reverse" => {
                fixed(0)?;
                Command::Reverse
            }
            "slice" => {
                fixed(2)?;
                Command::Slice(arg(&args, 0, "first")?, arg(&args, 1, "last")?)
            }
            "print" => {
                fixed(0)?;
                Command::Print
            }
            "size" => {
                fixed(0)?;
                Command::Size
            }
            "capacity" => {
                fixed(0)?;
                Command::Capacity
            }
            other => bail!("unknown command `{other}`"),
        };
        Ok(cmd)
    }
}

/// A parsed script line, keeping its 1-based line number for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: usize,
    pub command: Command,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {:?}", self.number, self.command)
    }
}

/// Parses a whole script. Blank lines and comments are skipped.
pub fn parse_script(source: &str) -> Result<Vec<Line>> {
    let mut lines = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let text = raw.split('#').next().unwrap_or_default().trim();
        if text.is_empty() {
            continue;
        }
        let command = text
            .parse()
            .with_context(|| format!("line {}: `{}`", idx + 1, text))?;
        lines.push(Line {
            number: idx + 1,
            command,
        });
    }
    Ok(lines)
}

/// Executes commands against one sequence, writing results to `out`.
///
/// Any container error stops the session; the caller decides whether that is
/// fatal.
pub struct Session<W: Write> {
    seq: SeqVec<i64>,
    out: W,
    trace_capacity: bool,
}

impl<W: Write> Session<W> {
    pub fn new(out: W) -> Self {
        Self {
            seq: SeqVec::new(),
            out,
            trace_capacity: false,
        }
    }

    /// Print length and capacity after every command.
    pub fn with_trace_capacity(mut self, enabled: bool) -> Self {
        self.trace_capacity = enabled;
        self
    }

    pub fn sequence(&self) -> &SeqVec<i64> {
        &self.seq
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Parses and runs `source`, stopping at the first failing line.
    pub fn run(&mut self, source: &str) -> Result<()> {
        let lines = parse_script(source)?;
        info!(commands = lines.len(), "running script");
        for line in &lines {
            self.execute(&line.command)
                .with_context(|| line.to_string())?;
        }
        Ok(())
    }

    pub fn execute(&mut self, command: &Command) -> Result<()> {
        debug!(?command, len = self.seq.len(), "execute");
        let seq = &mut self.seq;
        match command {
            Command::New(len) => *seq = SeqVec::try_with_len(*len)?,
            Command::List(values) => *seq = SeqVec::from(values.as_slice()),
            Command::PushBack(v) => seq.push_back(*v),
            Command::PushFront(v) => seq.push_front(*v),
            Command::PopBack => match seq.pop_back() {
                Some(v) => writeln!(self.out, "{v}")?,
                None => writeln!(self.out, "empty")?,
            },
            Command::PopFront => match seq.pop_front() {
                Some(v) => writeln!(self.out, "{v}")?,
                None => writeln!(self.out, "empty")?,
            },
            Command::Insert { at, value } => {
                seq.insert(seq.begin() + *at, *value)?;
            }
            Command::InsertN { at, count, value } => {
                seq.insert_n(seq.begin() + *at, *count, *value)?;
            }
            Command::InsertList { at, values } => {
                seq.insert_slice(seq.begin() + *at, values)?;
            }
            Command::Erase(at) => {
                seq.erase(seq.begin() + *at)?;
            }
            Command::EraseRange(first, last) => {
                let begin = seq.begin();
                seq.erase_range(begin + *first, begin + *last)?;
            }
            Command::At(index) => writeln!(self.out, "{}", seq.at(*index)?)?,
            Command::Front => {
                let v = seq.front().ok_or_else(|| anyhow!("front of an empty sequence"))?;
                writeln!(self.out, "{v}")?;
            }
            Command::Back => {
                let v = seq.back().ok_or_else(|| anyhow!("back of an empty sequence"))?;
                writeln!(self.out, "{v}")?;
            }
            Command::Resize(len) => seq.try_resize(*len)?,
            Command::Clear => seq.clear(),
            Command::Reverse => seq.reverse(),
            Command::Slice(first, last) => {
                let begin = seq.cbegin();
                let part = seq.slice(begin + *first, begin + *last)?;
                writeln!(self.out, "{part:?}")?;
            }
            Command::Print => writeln!(self.out, "{:?}", seq)?,
            Command::Size => writeln!(self.out, "{}", seq.len())?,
            Command::Capacity => writeln!(self.out, "{}", seq.capacity())?,
        }

        if self.trace_capacity {
            writeln!(
                self.out,
                "  len={} cap={}",
                self.seq.len(),
                self.seq.capacity()
            )?;
        }
        Ok(())
    }
}
