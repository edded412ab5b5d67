//! FreeRTOS tasks with statically allocated stacks
//!
//! A [`TaskSlot`] reserves the stack and the task control block at link time.
//! [`EspSpawner`] starts one context in a slot; the slot cannot be reused.

use alloc::boxed::Box;
use core::cell::UnsafeCell;
use core::ffi::{c_char, c_void};
use core::mem::{size_of, MaybeUninit};
use core::ptr;
use core::sync::atomic::{AtomicBool, Ordering};

use esp_idf_sys as sys;
use hal::error::{HalError, HalResult};
use hal::thread::{ContextSpec, Spawn, ThreadPriority};
use heapless::Vec;

/// FreeRTOS task name buffer length, terminator included
pub const TASK_NAME_LEN: usize = 16;

type TaskBody = Box<dyn FnOnce() + Send>;

/// Static storage for one task: `N` stack words plus the control block.
pub struct TaskSlot<const N: usize> {
    claimed: AtomicBool,
    stack: UnsafeCell<MaybeUninit<[sys::StackType_t; N]>>,
    tcb: UnsafeCell<MaybeUninit<sys::StaticTask_t>>,
}

// The cells are only handed out once, guarded by `claimed`.
unsafe impl<const N: usize> Sync for TaskSlot<N> {}

impl<const N: usize> TaskSlot<N> {
    pub const fn new() -> Self {
        Self {
            claimed: AtomicBool::new(false),
            stack: UnsafeCell::new(MaybeUninit::uninit()),
            tcb: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    /// Stack size in bytes
    pub const fn stack_bytes(&self) -> usize {
        N * size_of::<sys::StackType_t>()
    }

    fn claim(&'static self) -> Option<(*mut sys::StackType_t, *mut sys::StaticTask_t)> {
        if self.claimed.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some((self.stack.get().cast(), self.tcb.get().cast()))
    }
}

/// NUL-terminated copy of `name`, truncated to fit a FreeRTOS task name.
pub fn task_name(name: &str) -> Vec<u8, TASK_NAME_LEN> {
    let mut buf = Vec::new();
    for &byte in name.as_bytes().iter().take(TASK_NAME_LEN - 1) {
        // Capacity is reserved for the terminator above.
        let _ = buf.push(byte);
    }
    let _ = buf.push(0);
    buf
}

unsafe extern "C" fn trampoline(arg: *mut c_void) {
    let body = Box::from_raw(arg.cast::<TaskBody>());
    body();
    // A FreeRTOS task function must never return.
    sys::vTaskDelete(ptr::null_mut());
}

/// Change the priority of the calling task.
pub fn set_current_priority(priority: ThreadPriority) {
    unsafe { sys::vTaskPrioritySet(ptr::null_mut(), priority.raw().into()) };
}

/// Starts a context in a static [`TaskSlot`], on any core.
pub struct EspSpawner<const N: usize> {
    slot: &'static TaskSlot<N>,
}

impl<const N: usize> EspSpawner<N> {
    pub const fn new(slot: &'static TaskSlot<N>) -> Self {
        Self { slot }
    }
}

impl<const N: usize> Spawn for EspSpawner<N> {
    type Error = HalError;

    fn spawn<F>(&mut self, spec: &ContextSpec, body: F) -> HalResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        if spec.stack_size > self.slot.stack_bytes() {
            log::error!(
                "{}: needs {} stack bytes, slot has {}",
                spec.name,
                spec.stack_size,
                self.slot.stack_bytes()
            );
            return Err(HalError::InvalidParameter);
        }
        let (stack, tcb) = self.slot.claim().ok_or(HalError::Busy)?;

        let name = task_name(spec.name);
        let body: TaskBody = Box::new(body);
        let arg = Box::into_raw(Box::new(body));

        // ESP-IDF measures stack depth in bytes.
        let handle = unsafe {
            sys::xTaskCreateStaticPinnedToCore(
                Some(trampoline),
                name.as_ptr().cast::<c_char>(),
                self.slot.stack_bytes() as u32,
                arg.cast::<c_void>(),
                spec.priority.raw().into(),
                stack,
                tcb,
                sys::tskNO_AFFINITY as sys::BaseType_t,
            )
        };

        if handle.is_null() {
            drop(unsafe { Box::from_raw(arg) });
            return Err(HalError::HardwareError);
        }
        log::info!("{}: task started at {}", spec.name, spec.priority);
        Ok(())
    }
}
