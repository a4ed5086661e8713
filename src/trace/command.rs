//! Trace line parsing.

use std::str::SplitWhitespace;
use std::time::Duration;

use super::error::{TraceError, TraceResult};
use crate::name::Name;
use crate::pit::FaceId;

/// One event of a replay trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceCommand {
    /// `route <prefix> <face>...`
    Route { prefix: Name, faces: Vec<FaceId> },
    /// `interest <name> <face> [lifetime_ms] [nonce]`
    Interest {
        name: Name,
        face: FaceId,
        lifetime: Option<Duration>,
        nonce: Option<u32>,
    },
    /// `content <name>`
    Content { name: Name },
    /// `erase <name>`
    Erase { name: Name },
    /// `advance <ms>`
    Advance { by: Duration },
    /// `sweep`
    Sweep,
    /// `print`
    Print,
}

impl TraceCommand {
    /// Parses one trace line. Blank lines and `#` comments yield `None`.
    pub fn parse_line(line_no: usize, line: &str) -> TraceResult<Option<Self>> {
        let line = match line.find('#') {
            Some(at) => &line[..at],
            None => line,
        };
        let mut args = Args {
            line: line_no,
            tokens: line.split_whitespace(),
        };
        let keyword = match args.tokens.next() {
            Some(keyword) => keyword,
            None => return Ok(None),
        };

        let command = match keyword {
            "route" => {
                let prefix = args.name("route", "prefix")?;
                let mut faces = Vec::new();
                while let Some(face) = args.optional_number::<u32>("face")? {
                    faces.push(FaceId(face));
                }
                if faces.is_empty() {
                    return Err(TraceError::MissingArgument {
                        line: line_no,
                        command: "route",
                        argument: "face",
                    });
                }
                TraceCommand::Route { prefix, faces }
            }
            "interest" => {
                let name = args.name("interest", "name")?;
                let face = FaceId(args.number("interest", "face")?);
                let lifetime = args
                    .optional_number::<u64>("lifetime")?
                    .map(Duration::from_millis);
                let nonce = args.optional_number("nonce")?;
                TraceCommand::Interest {
                    name,
                    face,
                    lifetime,
                    nonce,
                }
            }
            "content" => TraceCommand::Content {
                name: args.name("content", "name")?,
            },
            "erase" => TraceCommand::Erase {
                name: args.name("erase", "name")?,
            },
            "advance" => TraceCommand::Advance {
                by: Duration::from_millis(args.number("advance", "milliseconds")?),
            },
            "sweep" => TraceCommand::Sweep,
            "print" => TraceCommand::Print,
            other => {
                return Err(TraceError::UnknownCommand {
                    line: line_no,
                    command: other.to_string(),
                })
            }
        };

        args.finish()?;
        Ok(Some(command))
    }
}

struct Args<'a> {
    line: usize,
    tokens: SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn required(&mut self, command: &'static str, argument: &'static str) -> TraceResult<&'a str> {
        self.tokens.next().ok_or(TraceError::MissingArgument {
            line: self.line,
            command,
            argument,
        })
    }

    fn name(&mut self, command: &'static str, argument: &'static str) -> TraceResult<Name> {
        let line = self.line;
        let raw = self.required(command, argument)?;
        Name::parse(raw).map_err(|source| TraceError::Name { line, source })
    }

    fn number<N: std::str::FromStr>(
        &mut self,
        command: &'static str,
        argument: &'static str,
    ) -> TraceResult<N> {
        let line = self.line;
        let raw = self.required(command, argument)?;
        parse_number(line, argument, raw)
    }

    fn optional_number<N: std::str::FromStr>(
        &mut self,
        argument: &'static str,
    ) -> TraceResult<Option<N>> {
        match self.tokens.next() {
            Some(raw) => parse_number(self.line, argument, raw).map(Some),
            None => Ok(None),
        }
    }

    fn finish(mut self) -> TraceResult<()> {
        match self.tokens.next() {
            Some(extra) => Err(TraceError::TrailingArgument {
                line: self.line,
                value: extra.to_string(),
            }),
            None => Ok(()),
        }
    }
}

fn parse_number<N: std::str::FromStr>(
    line: usize,
    argument: &'static str,
    raw: &str,
) -> TraceResult<N> {
    raw.parse().map_err(|_| TraceError::InvalidNumber {
        line,
        argument,
        value: raw.to_string(),
    })
}
