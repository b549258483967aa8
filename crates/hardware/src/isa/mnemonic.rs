//! SIC/XE instruction mnemonics.
//!
//! The instruction set is fixed, so instruction kinds form a closed
//! enumeration that the executor matches exhaustively. The catalog supplies
//! opcode, format and operand count for each kind at startup.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Every SIC/XE instruction.
///
/// Variant docs give the architectural effect; `m` is the target address,
/// `(m..m+2)` the word stored there and `CC` the condition code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mnemonic {
    /// `A <- A + (m..m+2)`
    Add,
    /// `F <- F + (m..m+5)`
    Addf,
    /// `r2 <- r2 + r1`
    Addr,
    /// `A <- A & (m..m+2)`
    And,
    /// `r1 <- 0`
    Clear,
    /// `A : (m..m+2)`
    Comp,
    /// `F : (m..m+5)`
    Compf,
    /// `r1 : r2`
    Compr,
    /// `A <- A / (m..m+2)`
    Div,
    /// `F <- F / (m..m+5)`
    Divf,
    /// `r2 <- r2 / r1`
    Divr,
    /// `A <- F (truncated)`
    Fix,
    /// `F <- A`
    Float,
    /// `Halt I/O channel`
    Hio,
    /// `PC <- m`
    J,
    /// `PC <- m if CC is equal`
    Jeq,
    /// `PC <- m if CC is greater`
    Jgt,
    /// `PC <- m if CC is less`
    Jlt,
    /// `L <- PC; PC <- m`
    Jsub,
    /// `A <- (m..m+2)`
    Lda,
    /// `B <- (m..m+2)`
    Ldb,
    /// `A[low byte] <- (m)`
    Ldch,
    /// `F <- (m..m+5)`
    Ldf,
    /// `L <- (m..m+2)`
    Ldl,
    /// `S <- (m..m+2)`
    Lds,
    /// `T <- (m..m+2)`
    Ldt,
    /// `X <- (m..m+2)`
    Ldx,
    /// `Load processor status`
    Lps,
    /// `A <- A * (m..m+2)`
    Mul,
    /// `F <- F * (m..m+5)`
    Mulf,
    /// `r2 <- r2 * r1`
    Mulr,
    /// `F <- normalized F`
    Norm,
    /// `A <- A | (m..m+2)`
    Or,
    /// `A[low byte] <- data from device (m)`
    Rd,
    /// `r2 <- r1`
    Rmo,
    /// `PC <- L`
    Rsub,
    /// `r1 <- r1 rotated left n bits`
    Shiftl,
    /// `r1 <- r1 shifted right n bits (arithmetic)`
    Shiftr,
    /// `Start I/O channel`
    Sio,
    /// `Set storage key`
    Ssk,
    /// `m..m+2 <- A`
    Sta,
    /// `m..m+2 <- B`
    Stb,
    /// `m <- A[low byte]`
    Stch,
    /// `m..m+5 <- F`
    Stf,
    /// `Set interval timer`
    Sti,
    /// `m..m+2 <- L`
    Stl,
    /// `m..m+2 <- S`
    Sts,
    /// `m..m+2 <- SW`
    Stsw,
    /// `m..m+2 <- T`
    Stt,
    /// `m..m+2 <- X`
    Stx,
    /// `A <- A - (m..m+2)`
    Sub,
    /// `F <- F - (m..m+5)`
    Subf,
    /// `r2 <- r2 - r1`
    Subr,
    /// `Supervisor call`
    Svc,
    /// `Test device (m)`
    Td,
    /// `Test I/O channel`
    Tio,
    /// `X <- X + 1; X : (m..m+2)`
    Tix,
    /// `X <- X + 1; X : r1`
    Tixr,
    /// `Device (m) <- A[low byte]`
    Wd,
}

impl Mnemonic {
    /// Every mnemonic, in alphabetical order.
    pub const ALL: [Self; 59] = [
        Self::Add,
        Self::Addf,
        Self::Addr,
        Self::And,
        Self::Clear,
        Self::Comp,
        Self::Compf,
        Self::Compr,
        Self::Div,
        Self::Divf,
        Self::Divr,
        Self::Fix,
        Self::Float,
        Self::Hio,
        Self::J,
        Self::Jeq,
        Self::Jgt,
        Self::Jlt,
        Self::Jsub,
        Self::Lda,
        Self::Ldb,
        Self::Ldch,
        Self::Ldf,
        Self::Ldl,
        Self::Lds,
        Self::Ldt,
        Self::Ldx,
        Self::Lps,
        Self::Mul,
        Self::Mulf,
        Self::Mulr,
        Self::Norm,
        Self::Or,
        Self::Rd,
        Self::Rmo,
        Self::Rsub,
        Self::Shiftl,
        Self::Shiftr,
        Self::Sio,
        Self::Ssk,
        Self::Sta,
        Self::Stb,
        Self::Stch,
        Self::Stf,
        Self::Sti,
        Self::Stl,
        Self::Sts,
        Self::Stsw,
        Self::Stt,
        Self::Stx,
        Self::Sub,
        Self::Subf,
        Self::Subr,
        Self::Svc,
        Self::Td,
        Self::Tio,
        Self::Tix,
        Self::Tixr,
        Self::Wd,
    ];

    /// Returns the assembler spelling of the mnemonic.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Addf => "ADDF",
            Self::Addr => "ADDR",
            Self::And => "AND",
            Self::Clear => "CLEAR",
            Self::Comp => "COMP",
            Self::Compf => "COMPF",
            Self::Compr => "COMPR",
            Self::Div => "DIV",
            Self::Divf => "DIVF",
            Self::Divr => "DIVR",
            Self::Fix => "FIX",
            Self::Float => "FLOAT",
            Self::Hio => "HIO",
            Self::J => "J",
            Self::Jeq => "JEQ",
            Self::Jgt => "JGT",
            Self::Jlt => "JLT",
            Self::Jsub => "JSUB",
            Self::Lda => "LDA",
            Self::Ldb => "LDB",
            Self::Ldch => "LDCH",
            Self::Ldf => "LDF",
            Self::Ldl => "LDL",
            Self::Lds => "LDS",
            Self::Ldt => "LDT",
            Self::Ldx => "LDX",
            Self::Lps => "LPS",
            Self::Mul => "MUL",
            Self::Mulf => "MULF",
            Self::Mulr => "MULR",
            Self::Norm => "NORM",
            Self::Or => "OR",
            Self::Rd => "RD",
            Self::Rmo => "RMO",
            Self::Rsub => "RSUB",
            Self::Shiftl => "SHIFTL",
            Self::Shiftr => "SHIFTR",
            Self::Sio => "SIO",
            Self::Ssk => "SSK",
            Self::Sta => "STA",
            Self::Stb => "STB",
            Self::Stch => "STCH",
            Self::Stf => "STF",
            Self::Sti => "STI",
            Self::Stl => "STL",
            Self::Sts => "STS",
            Self::Stsw => "STSW",
            Self::Stt => "STT",
            Self::Stx => "STX",
            Self::Sub => "SUB",
            Self::Subf => "SUBF",
            Self::Subr => "SUBR",
            Self::Svc => "SVC",
            Self::Td => "TD",
            Self::Tio => "TIO",
            Self::Tix => "TIX",
            Self::Tixr => "TIXR",
            Self::Wd => "WD",
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no SIC/XE instruction.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown mnemonic `{0}`")]
pub struct UnknownMnemonic(pub String);

impl FromStr for Mnemonic {
    type Err = UnknownMnemonic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMnemonic(s.to_owned()))
    }
}
