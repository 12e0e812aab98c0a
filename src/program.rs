//! Drives the parser and translator over a whole program.
//!
//! A program is an ordered list of source units. The entry unit is moved to
//! the front; everything else keeps the order it was given in. A unit that
//! fails stops at the offending line, but whatever it already emitted stays
//! in the output and the remaining units are still translated.

use std::{fmt, io};

use log::{debug, error, info};

use crate::{
    asm::Instruction,
    config::Options,
    error::{CommandError, UnitError},
    parser::parse_line,
    translator::Translator,
};

/// One `.vm` file: its logical name (file stem) and its raw lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub name: String,
    pub lines: Vec<String>,
}

impl SourceUnit {
    pub fn new(name: impl Into<String>, source: &str) -> Self {
        SourceUnit {
            name: name.into(),
            lines: source.lines().map(str::to_string).collect(),
        }
    }
}

/// Output of a whole run: the instruction stream plus every per-unit failure.
#[derive(Debug, Default)]
pub struct Translation {
    pub instructions: Vec<Instruction>,
    pub errors: Vec<UnitError>,
}

impl Translation {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn write_to(&self, out: &mut impl io::Write) -> io::Result<()> {
        for instruction in &self.instructions {
            writeln!(out, "{}", instruction)?;
        }
        Ok(())
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in &self.instructions {
            writeln!(f, "{}", instruction)?;
        }
        Ok(())
    }
}

/// Entry unit first, the rest in their given order.
pub fn order_units<'a>(units: &'a [SourceUnit], entry: &str) -> Vec<&'a SourceUnit> {
    let mut ordered: Vec<&SourceUnit> = units.iter().collect();
    if let Some(pos) = ordered.iter().position(|unit| unit.name == entry) {
        let unit = ordered.remove(pos);
        ordered.insert(0, unit);
    }
    ordered
}

/// Translate one unit, appending to `out` as it goes. Returns the number of
/// commands translated.
fn translate_unit(
    translator: &mut Translator,
    unit: &SourceUnit,
    out: &mut Vec<Instruction>,
) -> Result<usize, UnitError> {
    translator.begin_unit(&unit.name);
    let mut count = 0;

    for (index, line) in unit.lines.iter().enumerate() {
        let failed = |kind: CommandError| UnitError {
            unit: unit.name.clone(),
            line: index + 1,
            command: line.trim().to_string(),
            kind,
        };

        let command = match parse_line(line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => return Err(failed(e.into())),
        };
        let block = translator
            .translate(&command)
            .map_err(|e| failed(e.into()))?;
        out.extend(block);
        count += 1;
    }

    Ok(count)
}

/// Translate every unit behind a single bootstrap prologue.
pub fn translate_units(units: &[SourceUnit], options: Options) -> Translation {
    let mut translator = Translator::new(options);
    let mut translation = Translation {
        instructions: translator.bootstrap(),
        errors: vec![],
    };

    let entry = translator.options().entry_unit.clone();
    for unit in order_units(units, &entry) {
        match translate_unit(&mut translator, unit, &mut translation.instructions) {
            Ok(count) => debug!("translated {} ({} commands)", unit.name, count),
            Err(e) => {
                error!("{}", e);
                translation.errors.push(e);
            }
        }
    }

    info!(
        "{} units, {} instructions, {} failed",
        units.len(),
        translation.instructions.iter().filter(|i| i.is_code()).count(),
        translation.errors.len()
    );
    translation
}
