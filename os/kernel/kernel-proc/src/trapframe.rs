//! # Saved User Register State

/// Length of the `int 0x80` instruction that entered the kernel.
pub const SYSCALL_INSN_LEN: u64 = 2;

/// User registers saved on kernel entry.
///
/// Layout matches the interrupt-gate entry stub: the CPU pushes
/// `RIP, CS, RFLAGS, RSP, SS`, the stub pushes the general purpose registers.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[repr(C)]
pub struct TrapFrame {
    pub rip: u64,
    pub cs: u64,
    pub rflags: u64,
    pub rsp: u64,
    pub ss: u64,
    /// Syscall number on entry, return value on exit.
    pub rax: u64,
    pub rbx: u64,
    pub rcx: u64,
    /// Error flag on syscall return; zero means success.
    pub rdx: u64,
    pub rsi: u64,
    pub rdi: u64,
    pub rbp: u64,
    pub r8: u64,
    pub r9: u64,
    pub r10: u64,
    pub r11: u64,
    pub r12: u64,
    pub r13: u64,
    pub r14: u64,
    pub r15: u64,
}

impl TrapFrame {
    /// Make the interrupted syscall return `value` with the error flag clear,
    /// resuming after the syscall instruction.
    #[inline]
    pub const fn complete_syscall(&mut self, value: u64) {
        self.rax = value;
        self.rdx = 0;
        self.rip = self.rip.wrapping_add(SYSCALL_INSN_LEN);
    }
}
