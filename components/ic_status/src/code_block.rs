//! Profiled code blocks
//!
//! A [`CodeBlock`] owns one function's bytecode together with the profiling
//! state the tiers attach to it: JIT stub records and the exit-site
//! history. Stub records are rewritten by the executing thread, so compiler
//! threads read them through [`CodeBlock::lock`].
//!
//! Lock order: the JIT data lock may be held while taking the exit profile
//! lock, never the other way round.

use core_types::{BytecodeIndex, ExitFlag, ObjectId};
use bytecode_system::BytecodeChunk;
use parking_lot::{Mutex, MutexGuard};

use crate::call_link_status::{compute_exit_site_data, ExitSiteData};
use crate::exit_profile::{has_bad_cache_exit_site, ExitProfile, FrequentExitSite};
use crate::ic_context::{ICStatus, ICStatusMap};
use crate::stub_info::{StubInfo, StubInfoId};

/// Baseline JIT state guarded by the code block lock
#[derive(Debug, Default)]
pub struct JitData {
    stub_infos: Vec<StubInfo>,
}

impl JitData {
    /// Look up a stub record
    pub fn stub_info(&self, id: StubInfoId) -> Option<&StubInfo> {
        self.stub_infos.get(id.0 as usize)
    }

    /// Look up a stub record for updating
    pub fn stub_info_mut(&mut self, id: StubInfoId) -> Option<&mut StubInfo> {
        self.stub_infos.get_mut(id.0 as usize)
    }

    /// Iterate all stub records with their handles
    pub fn stub_infos(&self) -> impl Iterator<Item = (StubInfoId, &StubInfo)> + '_ {
        self.stub_infos
            .iter()
            .enumerate()
            .map(|(index, stub)| (StubInfoId(index as u32), stub))
    }
}

/// Proof that the code block lock is held
pub type ConcurrentJsLocker<'a> = MutexGuard<'a, JitData>;

/// A function's bytecode with its profiling state
#[derive(Debug)]
pub struct CodeBlock {
    chunk: BytecodeChunk,
    global_object: ObjectId,
    jit_data: Mutex<JitData>,
    exit_profile: Mutex<ExitProfile>,
}

impl CodeBlock {
    /// Create a code block for `chunk`, compiled in `global_object`
    pub fn new(chunk: BytecodeChunk, global_object: ObjectId) -> Self {
        Self {
            chunk,
            global_object,
            jit_data: Mutex::new(JitData::default()),
            exit_profile: Mutex::new(ExitProfile::new()),
        }
    }

    /// The bytecode
    pub fn chunk(&self) -> &BytecodeChunk {
        &self.chunk
    }

    /// Global object the code runs in
    pub fn global_object(&self) -> ObjectId {
        self.global_object
    }

    /// Take the code block lock
    pub fn lock(&self) -> ConcurrentJsLocker<'_> {
        self.jit_data.lock()
    }

    /// Whether `locker` guards this code block's stub records
    pub fn holds_lock(&self, locker: &ConcurrentJsLocker<'_>) -> bool {
        std::ptr::eq(MutexGuard::mutex(locker), &self.jit_data)
    }

    /// Register a stub record
    pub fn add_stub_info(&self, stub: StubInfo) -> StubInfoId {
        let mut jit_data = self.lock();
        let id = StubInfoId(jit_data.stub_infos.len() as u32);
        jit_data.stub_infos.push(stub);
        id
    }

    /// Record a frequent exit site
    pub fn add_exit_site(&self, site: FrequentExitSite) -> bool {
        self.exit_profile.lock().add(site)
    }

    /// Bad-cache exits recorded at `index`
    pub fn has_bad_cache_exit_site(&self, index: BytecodeIndex) -> ExitFlag {
        has_bad_cache_exit_site(&self.exit_profile.lock(), index)
    }

    /// Exits recorded for calls made at `index`
    pub fn call_exit_site_data(&self, index: BytecodeIndex) -> ExitSiteData {
        compute_exit_site_data(&self.exit_profile.lock(), index)
    }

    /// Map every stub record to the location it profiles
    pub fn ic_status_map(&self) -> ICStatusMap {
        let jit_data = self.lock();
        jit_data
            .stub_infos()
            .map(|(id, stub)| {
                (
                    stub.code_origin,
                    ICStatus {
                        stub_info: Some(id),
                        get_status: None,
                    },
                )
            })
            .collect()
    }
}
