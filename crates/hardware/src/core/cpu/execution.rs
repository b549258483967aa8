//! Instruction Semantics.
//!
//! This module executes one decoded instruction against the machine state. It performs the following:
//! 1. **Data Movement:** Register loads and stores of words and bytes.
//! 2. **Arithmetic:** Integer and register-register arithmetic, logic and shifts.
//! 3. **Control Flow:** Comparisons, conditional branches and the `JSUB`/`RSUB` linkage.
//! 4. **Device I/O:** `RD`, `WD` and `TD` through the device gateway.
//!
//! Dispatch is an exhaustive match over [`Mnemonic`]; instructions without
//! defined behavior here fail with [`SimError::Unsupported`].

use tracing::debug;

use super::{ConditionCode, Cpu};
use crate::common::constants::WORD_MASK;
use crate::common::{Reg, Result, SimError, hex};
use crate::isa::{Decoded, Format, Mnemonic};
use crate::soc::devices::device_name;

impl Cpu {
    /// Executes `inst` and returns the address of the next instruction.
    ///
    /// `PC` is advanced past the instruction before its semantics run, so
    /// `JSUB` links to the following instruction and a format 2 write to `PC`
    /// acts as a jump.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfRange`], [`SimError::InvalidRegister`],
    /// [`SimError::Device`], [`SimError::DivideByZero`] or
    /// [`SimError::Unsupported`]. Register and memory writes made before the
    /// failure are kept.
    pub fn execute(&mut self, inst: &Decoded) -> Result<u32> {
        self.regs.set_pc(inst.next_pc());
        self.last_target = None;

        let ta = match inst.format {
            Format::Three | Format::Four => {
                let ta = self.target_address(inst);
                self.last_target = Some(ta);
                ta
            }
            Format::One | Format::Two => 0,
        };
        let (r1, r2) = inst.registers();

        match inst.mnemonic {
            Mnemonic::Lda => self.load_register(Reg::A, inst, ta)?,
            Mnemonic::Ldb => self.load_register(Reg::B, inst, ta)?,
            Mnemonic::Ldl => self.load_register(Reg::L, inst, ta)?,
            Mnemonic::Lds => self.load_register(Reg::S, inst, ta)?,
            Mnemonic::Ldt => self.load_register(Reg::T, inst, ta)?,
            Mnemonic::Ldx => self.load_register(Reg::X, inst, ta)?,
            Mnemonic::Ldch => {
                let byte = self.load_byte(inst, ta)?;
                self.set_low_byte(byte);
            }

            Mnemonic::Sta => self.store_word(inst, ta, self.regs.get(Reg::A))?,
            Mnemonic::Stb => self.store_word(inst, ta, self.regs.get(Reg::B))?,
            Mnemonic::Stl => self.store_word(inst, ta, self.regs.get(Reg::L))?,
            Mnemonic::Sts => self.store_word(inst, ta, self.regs.get(Reg::S))?,
            Mnemonic::Stt => self.store_word(inst, ta, self.regs.get(Reg::T))?,
            Mnemonic::Stx => self.store_word(inst, ta, self.regs.get(Reg::X))?,
            Mnemonic::Stsw => self.store_word(inst, ta, self.regs.get(Reg::SW))?,
            Mnemonic::Stch => {
                let addr = self.effective_address(inst, ta)?;
                self.memory.write_u8(addr, self.regs.get(Reg::A) as u8)?;
            }

            Mnemonic::Add => self.accumulate(inst, ta, i32::wrapping_add)?,
            Mnemonic::Sub => self.accumulate(inst, ta, i32::wrapping_sub)?,
            Mnemonic::Mul => self.accumulate(inst, ta, i32::wrapping_mul)?,
            Mnemonic::And => self.accumulate(inst, ta, |a, b| a & b)?,
            Mnemonic::Or => self.accumulate(inst, ta, |a, b| a | b)?,
            Mnemonic::Div => {
                let divisor = self.load_word(inst, ta)?;
                let quotient = divide(self.regs.get(Reg::A), divisor, inst.addr)?;
                self.regs.set(Reg::A, quotient);
            }

            Mnemonic::Comp => {
                let value = self.load_word(inst, ta)?;
                self.cc = self.regs.get(Reg::A).cmp(&value).into();
            }
            Mnemonic::Tix => {
                let x = self.regs.get(Reg::X).wrapping_add(1);
                self.regs.set(Reg::X, x);
                let value = self.load_word(inst, ta)?;
                self.cc = x.cmp(&value).into();
            }

            Mnemonic::J => {
                let target = self.effective_address(inst, ta)?;
                self.jump(target);
            }
            Mnemonic::Jeq => self.branch_if(inst, ta, ConditionCode::Equal)?,
            Mnemonic::Jlt => self.branch_if(inst, ta, ConditionCode::Less)?,
            Mnemonic::Jgt => self.branch_if(inst, ta, ConditionCode::Greater)?,
            Mnemonic::Jsub => {
                let target = self.effective_address(inst, ta)?;
                self.regs.set(Reg::L, inst.next_pc() as i32);
                self.jump(target);
            }
            Mnemonic::Rsub => self.jump(self.regs.get(Reg::L) as u32),

            Mnemonic::Rd => {
                let name = self.device_operand(inst, ta)?;
                let byte = self.devices.read(&name, 1)?.first().copied().unwrap_or(0);
                self.set_low_byte(byte);
                debug!(device = %name, byte = format_args!("{byte:02X}"), "read device");
            }
            Mnemonic::Wd => {
                let name = self.device_operand(inst, ta)?;
                let byte = self.regs.get(Reg::A) as u8;
                self.devices.write(&name, &[byte])?;
                debug!(device = %name, byte = format_args!("{byte:02X}"), "write device");
            }
            Mnemonic::Td => {
                let name = self.device_operand(inst, ta)?;
                self.cc = if self.devices.test(&name) {
                    ConditionCode::Less
                } else {
                    ConditionCode::Equal
                };
            }

            Mnemonic::Clear => self.regs.write(r1, 0)?,
            Mnemonic::Rmo => self.regs.write(r2, self.regs.read(r1)?)?,
            Mnemonic::Addr => self.combine(r1, r2, i32::wrapping_add)?,
            Mnemonic::Subr => self.combine(r1, r2, i32::wrapping_sub)?,
            Mnemonic::Mulr => self.combine(r1, r2, i32::wrapping_mul)?,
            Mnemonic::Divr => {
                let quotient = divide(self.regs.read(r2)?, self.regs.read(r1)?, inst.addr)?;
                self.regs.write(r2, quotient)?;
            }
            Mnemonic::Compr => {
                self.cc = self.regs.read(r1)?.cmp(&self.regs.read(r2)?).into();
            }
            Mnemonic::Tixr => {
                let x = self.regs.get(Reg::X).wrapping_add(1);
                self.regs.set(Reg::X, x);
                self.cc = x.cmp(&self.regs.read(r1)?).into();
            }
            Mnemonic::Shiftl => {
                let value = rotate_word_left(self.regs.read(r1)?, u32::from(r2) + 1);
                self.regs.write(r1, value)?;
            }
            Mnemonic::Shiftr => {
                let value = self.regs.read(r1)? >> (u32::from(r2) + 1);
                self.regs.write(r1, value)?;
            }

            Mnemonic::Fix => self.regs.set(Reg::A, self.regs.f.trunc() as i32),
            Mnemonic::Float => self.regs.f = f64::from(self.regs.get(Reg::A)),

            Mnemonic::Addf
            | Mnemonic::Subf
            | Mnemonic::Mulf
            | Mnemonic::Divf
            | Mnemonic::Compf
            | Mnemonic::Ldf
            | Mnemonic::Stf
            | Mnemonic::Norm
            | Mnemonic::Sio
            | Mnemonic::Hio
            | Mnemonic::Tio
            | Mnemonic::Ssk
            | Mnemonic::Svc
            | Mnemonic::Lps
            | Mnemonic::Sti => {
                return Err(SimError::Unsupported {
                    mnemonic: inst.mnemonic.to_string(),
                    addr: inst.addr,
                });
            }
        }

        Ok(self.regs.pc())
    }

    fn jump(&mut self, target: u32) {
        self.regs.set_pc(target);
        self.last_target = Some(target);
    }

    fn branch_if(&mut self, inst: &Decoded, ta: u32, wanted: ConditionCode) -> Result<()> {
        if self.cc == wanted {
            let target = self.effective_address(inst, ta)?;
            self.jump(target);
        }
        Ok(())
    }

    fn load_register(&mut self, reg: Reg, inst: &Decoded, ta: u32) -> Result<()> {
        let value = self.load_word(inst, ta)?;
        self.regs.set(reg, value);
        Ok(())
    }

    /// Replaces the rightmost byte of `A`.
    fn set_low_byte(&mut self, byte: u8) {
        let a = self.regs.get(Reg::A);
        self.regs.set(Reg::A, (a & !0xFF) | i32::from(byte));
    }

    fn accumulate(&mut self, inst: &Decoded, ta: u32, op: fn(i32, i32) -> i32) -> Result<()> {
        let value = self.load_word(inst, ta)?;
        self.regs.set(Reg::A, op(self.regs.get(Reg::A), value));
        Ok(())
    }

    /// `r2 <- r2 op r1`.
    fn combine(&mut self, r1: u8, r2: u8, op: fn(i32, i32) -> i32) -> Result<()> {
        let value = op(self.regs.read(r2)?, self.regs.read(r1)?);
        self.regs.write(r2, value)
    }

    /// Device number stored at the operand, as a device name.
    fn device_operand(&mut self, inst: &Decoded, ta: u32) -> Result<String> {
        let name = device_name(self.load_byte(inst, ta)?);
        self.last_device = Some(name.clone());
        Ok(name)
    }
}

fn divide(dividend: i32, divisor: i32, addr: u32) -> Result<i32> {
    if divisor == 0 {
        return Err(SimError::DivideByZero(addr));
    }
    Ok(dividend.wrapping_div(divisor))
}

/// Circular left shift within the 24-bit word; the result is sign-extended.
fn rotate_word_left(value: i32, count: u32) -> i32 {
    let word = value as u32 & WORD_MASK;
    let count = count % 24;
    let rotated = ((word << count) | (word >> (24 - count))) & WORD_MASK;
    hex::sign_extend(rotated, 24)
}
