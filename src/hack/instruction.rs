//! Types for representing Hack instructions and their parts.

use std::convert::TryFrom;
use std::fmt;

/// Operand of an A-instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum Address {
    Literal(u16),
    Symbol(String),
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Address::Literal(value) => write!(f, "{}", value),
            Address::Symbol(symbol) => write!(f, "{}", symbol),
        }
    }
}

/// Destination registers of a C-instruction.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Dest {
    pub a: bool,
    pub d: bool,
    pub m: bool,
}

impl Dest {
    /// Parses any combination of `A`, `D` and `M`, each appearing at most once.
    pub fn from_mnemonic(input: &str) -> Option<Dest> {
        let mut dest = Dest::default();

        for c in input.chars() {
            let flag = match c {
                'A' => &mut dest.a,
                'D' => &mut dest.d,
                'M' => &mut dest.m,
                _ => return None,
            };

            if *flag {
                return None;
            }

            *flag = true;
        }

        Some(dest)
    }

    pub fn is_empty(&self) -> bool {
        !(self.a || self.d || self.m)
    }

    pub fn bits(&self) -> u16 {
        (self.a as u16) << 2 | (self.d as u16) << 1 | self.m as u16
    }

    pub fn from_bits(bits: u16) -> Dest {
        Dest {
            a: bits & 0b100 != 0,
            d: bits & 0b010 != 0,
            m: bits & 0b001 != 0,
        }
    }
}

impl fmt::Display for Dest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.a {
            write!(f, "A")?;
        }

        if self.m {
            write!(f, "M")?;
        }

        if self.d {
            write!(f, "D")?;
        }

        Ok(())
    }
}

/// Jump condition of a C-instruction, tested against the ALU output.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Jump {
    Never,
    Greater,
    Equal,
    GreaterEqual,
    Less,
    NotEqual,
    LessEqual,
    Always,
}

impl Jump {
    pub fn from_mnemonic(input: &str) -> Option<Jump> {
        let jump = match input {
            "JGT" => Jump::Greater,
            "JEQ" => Jump::Equal,
            "JGE" => Jump::GreaterEqual,
            "JLT" => Jump::Less,
            "JNE" => Jump::NotEqual,
            "JLE" => Jump::LessEqual,
            "JMP" => Jump::Always,
            _ => return None,
        };

        Some(jump)
    }

    pub fn mnemonic(&self) -> Option<&'static str> {
        match self {
            Jump::Never => None,
            Jump::Greater => Some("JGT"),
            Jump::Equal => Some("JEQ"),
            Jump::GreaterEqual => Some("JGE"),
            Jump::Less => Some("JLT"),
            Jump::NotEqual => Some("JNE"),
            Jump::LessEqual => Some("JLE"),
            Jump::Always => Some("JMP"),
        }
    }

    pub fn bits(&self) -> u16 {
        match self {
            Jump::Never => 0b000,
            Jump::Greater => 0b001,
            Jump::Equal => 0b010,
            Jump::GreaterEqual => 0b011,
            Jump::Less => 0b100,
            Jump::NotEqual => 0b101,
            Jump::LessEqual => 0b110,
            Jump::Always => 0b111,
        }
    }

    pub fn from_bits(bits: u16) -> Jump {
        match bits & 0b111 {
            0b000 => Jump::Never,
            0b001 => Jump::Greater,
            0b010 => Jump::Equal,
            0b011 => Jump::GreaterEqual,
            0b100 => Jump::Less,
            0b101 => Jump::NotEqual,
            0b110 => Jump::LessEqual,
            _ => Jump::Always,
        }
    }

    /// Returns true if a jump with this condition is taken for ALU output `out`.
    pub fn test(&self, out: i16) -> bool {
        let bits = self.bits();

        (bits & 0b100 != 0 && out < 0)
            || (bits & 0b010 != 0 && out == 0)
            || (bits & 0b001 != 0 && out > 0)
    }
}

/// The 7-bit computation field (`a c1 c2 c3 c4 c5 c6`) of a C-instruction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Comp(u8);

macro_rules! comp_table {
    ( $( $mnemonic:literal => $bits:literal ),* $(,)? ) => {
        impl Comp {
            /// Looks up the computation for its assembly mnemonic. Commutative operations are
            /// accepted in either operand order.
            pub fn from_mnemonic(input: &str) -> Option<Comp> {
                match input {
                    $( $mnemonic => Some(Comp($bits)), )*
                    "A+D" => Some(Comp(0b0_000010)),
                    "M+D" => Some(Comp(0b1_000010)),
                    "A&D" => Some(Comp(0b0_000000)),
                    "M&D" => Some(Comp(0b1_000000)),
                    "A|D" => Some(Comp(0b0_010101)),
                    "M|D" => Some(Comp(0b1_010101)),
                    _ => None,
                }
            }

            /// The canonical mnemonic of the computation, `None` for bit patterns outside of
            /// the instruction set.
            pub fn mnemonic(&self) -> Option<&'static str> {
                match self.0 {
                    $( $bits => Some($mnemonic), )*
                    _ => None,
                }
            }
        }
    };
}

comp_table! {
    "0"   => 0b0_101010,
    "1"   => 0b0_111111,
    "-1"  => 0b0_111010,
    "D"   => 0b0_001100,
    "A"   => 0b0_110000,
    "!D"  => 0b0_001101,
    "!A"  => 0b0_110001,
    "-D"  => 0b0_001111,
    "-A"  => 0b0_110011,
    "D+1" => 0b0_011111,
    "A+1" => 0b0_110111,
    "D-1" => 0b0_001110,
    "A-1" => 0b0_110010,
    "D+A" => 0b0_000010,
    "D-A" => 0b0_010011,
    "A-D" => 0b0_000111,
    "D&A" => 0b0_000000,
    "D|A" => 0b0_010101,
    "M"   => 0b1_110000,
    "!M"  => 0b1_110001,
    "-M"  => 0b1_110011,
    "M+1" => 0b1_110111,
    "M-1" => 0b1_110010,
    "D+M" => 0b1_000010,
    "D-M" => 0b1_010011,
    "M-D" => 0b1_000111,
    "D&M" => 0b1_000000,
    "D|M" => 0b1_010101,
}

impl Comp {
    pub fn bits(&self) -> u16 {
        self.0 as u16
    }

    /// True if the second ALU input is `RAM[A]` rather than `A`.
    pub fn reads_memory(&self) -> bool {
        self.0 & 0b1_000000 != 0
    }

    /// Runs the ALU on inputs `x` (the D register) and `y` (A or `RAM[A]`).
    pub fn compute(&self, x: i16, y: i16) -> i16 {
        let bit = |n: u8| self.0 & (1 << n) != 0;
        let (zx, nx, zy, ny, f, no) = (bit(5), bit(4), bit(3), bit(2), bit(1), bit(0));

        let mut x = if zx { 0 } else { x };
        if nx {
            x = !x;
        }

        let mut y = if zy { 0 } else { y };
        if ny {
            y = !y;
        }

        let out = if f { x.wrapping_add(y) } else { x & y };

        if no { !out } else { out }
    }
}

impl fmt::Display for Comp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.mnemonic() {
            Some(mnemonic) => write!(f, "{}", mnemonic),
            None => write!(f, "<invalid 0b{:07b}>", self.0),
        }
    }
}

/// A line of Hack assembly.
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    /// `@value`
    Address(Address),
    /// `dest=comp;jump`
    Compute { dest: Dest, comp: Comp, jump: Jump },
    /// `(LABEL)`, a pseudo instruction that emits no code.
    Label(String),
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Instruction::Address(address) => write!(f, "@{}", address),
            Instruction::Label(label) => write!(f, "({})", label),
            Instruction::Compute { dest, comp, jump } => {
                if !dest.is_empty() {
                    write!(f, "{}=", dest)?;
                }

                write!(f, "{}", comp)?;

                if let Some(jump) = jump.mnemonic() {
                    write!(f, ";{}", jump)?;
                }

                Ok(())
            },
        }
    }
}

/// An instruction with every symbol resolved, as stored in ROM.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MachineInstruction {
    /// Loads a 15-bit value into the A register.
    Load(u16),
    Compute { dest: Dest, comp: Comp, jump: Jump },
}

impl From<MachineInstruction> for u16 {
    fn from(ins: MachineInstruction) -> u16 {
        match ins {
            MachineInstruction::Load(value) => value & 0x7FFF,
            MachineInstruction::Compute { dest, comp, jump } =>
                0b111 << 13 | comp.bits() << 6 | dest.bits() << 3 | jump.bits(),
        }
    }
}

impl From<MachineInstruction> for Instruction {
    fn from(ins: MachineInstruction) -> Instruction {
        match ins {
            MachineInstruction::Load(value) => Instruction::Address(Address::Literal(value)),
            MachineInstruction::Compute { dest, comp, jump } =>
                Instruction::Compute { dest, comp, jump },
        }
    }
}

impl fmt::Display for MachineInstruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", Instruction::from(*self))
    }
}

impl TryFrom<u16> for MachineInstruction {
    type Error = ();

    fn try_from(word: u16) -> Result<MachineInstruction, ()> {
        if word & 0x8000 == 0 {
            return Ok(MachineInstruction::Load(word));
        }

        if word & 0x6000 != 0x6000 {
            return Err(());
        }

        let comp = Comp(((word >> 6) & 0x7F) as u8);

        if comp.mnemonic().is_none() {
            return Err(());
        }

        Ok(MachineInstruction::Compute {
            dest: Dest::from_bits(word >> 3),
            comp,
            jump: Jump::from_bits(word),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_words() {
        let word: u16 = MachineInstruction::Compute {
            dest: Dest::from_mnemonic("D").unwrap(),
            comp: Comp::from_mnemonic("M").unwrap(),
            jump: Jump::Never,
        }
        .into();

        assert_eq!(word, 0b1111_1100_0001_0000);

        let word: u16 = MachineInstruction::Compute {
            dest: Dest::default(),
            comp: Comp::from_mnemonic("0").unwrap(),
            jump: Jump::Always,
        }
        .into();

        assert_eq!(word, 0b1110_1010_1000_0111);
    }

    #[test]
    fn test_decode_rejects_invalid_words() {
        assert_eq!(MachineInstruction::try_from(0b1000_0000_0000_0000), Err(()));
        // comp bits 1111111 are not an instruction
        assert_eq!(MachineInstruction::try_from(0b1111_1111_1100_0000), Err(()));
        assert_eq!(MachineInstruction::try_from(5), Ok(MachineInstruction::Load(5)));
    }

    #[test]
    fn test_alu() {
        let compute = |mnemonic: &str, d: i16, a: i16| {
            Comp::from_mnemonic(mnemonic).unwrap().compute(d, a)
        };

        assert_eq!(compute("0", 5, 7), 0);
        assert_eq!(compute("1", 5, 7), 1);
        assert_eq!(compute("-1", 5, 7), -1);
        assert_eq!(compute("D", 5, 7), 5);
        assert_eq!(compute("!A", 5, 7), !7);
        assert_eq!(compute("-D", 5, 7), -5);
        assert_eq!(compute("D+1", 5, 7), 6);
        assert_eq!(compute("A-1", 5, 7), 6);
        assert_eq!(compute("D+A", 5, 7), 12);
        assert_eq!(compute("D-A", 5, 7), -2);
        assert_eq!(compute("A-D", 5, 7), 2);
        assert_eq!(compute("D&A", 0b1100, 0b1010), 0b1000);
        assert_eq!(compute("D|A", 0b1100, 0b1010), 0b1110);
        assert_eq!(compute("M+D", 5, 7), 12);
        assert_eq!(compute("D+A", i16::max_value(), 1), i16::min_value());
    }

    #[test]
    fn test_dest_parsing() {
        assert_eq!(Dest::from_mnemonic("AM").map(|d| d.bits()), Some(0b101));
        assert_eq!(Dest::from_mnemonic("MD").map(|d| d.bits()), Some(0b011));
        assert_eq!(Dest::from_mnemonic("DD"), None);
        assert_eq!(Dest::from_mnemonic("X"), None);
    }

    #[test]
    fn test_jump_conditions() {
        assert!(Jump::Equal.test(0));
        assert!(!Jump::Equal.test(1));
        assert!(Jump::Less.test(-3));
        assert!(Jump::Greater.test(3));
        assert!(!Jump::Greater.test(0));
        assert!(Jump::NotEqual.test(-1));
        assert!(Jump::Always.test(0));
        assert!(!Jump::Never.test(0));
    }
}
