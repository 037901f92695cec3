use std::sync::{Arc, Mutex, MutexGuard};

use kernel_intf::{AlarmClient, Delay, I2cParent, IrqChip, IrqController, KError, RegisterMap, Yield};

use crate::*;


::tests::init_test_logger!(max77686_rtc);

pub const PARENT_IRQ: u32 = 40;
pub const PLATFORM_IRQ: u32 = 77;
pub const VIRQ_BASE: u32 = 200;
pub const ALARM_VIRQ: u32 = VIRQ_BASE + RTCIRQ_RTCA1 as u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Space {
    Parent,
    Rtc
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Read(Space, u8),
    Write(Space, u8, u8),
    BulkRead(Space, u8, usize),
    BulkWrite(Space, u8, Vec<u8>)
}

/// Register file of a PMIC with a separate RTC address
pub struct FakePmic {
    parent: [u8; 256],
    rtc: [u8; 256],
    pub log: Vec<Access>,
    // Any access touching this register fails
    pub fail: Option<(Space, u8)>,
    // Update register, pulsed bits read back as zero
    pub self_clearing: Option<(Space, u8)>
}

impl FakePmic {
    fn new() -> Self {
        Self {
            parent: [0; 256],
            rtc: [0; 256],
            log: Vec::new(),
            fail: None,
            self_clearing: None
        }
    }

    fn space(&mut self, space: Space) -> &mut [u8; 256] {
        match space {
            Space::Parent => &mut self.parent,
            Space::Rtc => &mut self.rtc
        }
    }

    pub fn peek(&mut self, space: Space, reg: u8) -> u8 {
        self.space(space)[reg as usize]
    }

    pub fn poke(&mut self, space: Space, reg: u8, value: u8) {
        self.space(space)[reg as usize] = value;
    }

    pub fn block(&mut self, space: Space, reg: u8) -> [u8; RTC_NR_TIME] {
        let start = reg as usize;
        let mut out = [0u8; RTC_NR_TIME];
        out.copy_from_slice(&self.space(space)[start..start + RTC_NR_TIME]);
        out
    }

    pub fn set_block(&mut self, space: Space, reg: u8, data: [u8; RTC_NR_TIME]) {
        let start = reg as usize;
        self.space(space)[start..start + RTC_NR_TIME].copy_from_slice(&data);
    }

    fn check(&self, space: Space, reg: u8, len: usize) -> Result<(), KError> {
        match self.fail {
            Some((fail_space, fail_reg)) if fail_space == space
                && (reg as usize..reg as usize + len).contains(&(fail_reg as usize)) => Err(KError::IoError),
            _ => Ok(())
        }
    }

    fn store(&mut self, space: Space, reg: u8, value: u8) {
        let value = if self.self_clearing == Some((space, reg)) { 0 } else { value };
        self.poke(space, reg, value);
    }
}

#[derive(Clone)]
pub struct FakeMap {
    pmic: Arc<Mutex<FakePmic>>,
    space: Space
}

impl RegisterMap for FakeMap {
    fn read(&mut self, reg: u8) -> Result<u8, KError> {
        let mut pmic = self.pmic.lock().unwrap();
        pmic.check(self.space, reg, 1)?;
        pmic.log.push(Access::Read(self.space, reg));
        Ok(pmic.peek(self.space, reg))
    }

    fn write(&mut self, reg: u8, value: u8) -> Result<(), KError> {
        let mut pmic = self.pmic.lock().unwrap();
        pmic.check(self.space, reg, 1)?;
        pmic.log.push(Access::Write(self.space, reg, value));
        pmic.store(self.space, reg, value);
        Ok(())
    }

    fn bulk_read(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), KError> {
        let mut pmic = self.pmic.lock().unwrap();
        pmic.check(self.space, reg, buf.len())?;
        pmic.log.push(Access::BulkRead(self.space, reg, buf.len()));
        for (idx, byte) in buf.iter_mut().enumerate() {
            *byte = pmic.peek(self.space, reg + idx as u8);
        }
        Ok(())
    }

    fn bulk_write(&mut self, reg: u8, data: &[u8]) -> Result<(), KError> {
        let mut pmic = self.pmic.lock().unwrap();
        pmic.check(self.space, reg, data.len())?;
        pmic.log.push(Access::BulkWrite(self.space, reg, data.to_vec()));
        for (idx, byte) in data.iter().enumerate() {
            pmic.store(self.space, reg + idx as u8, *byte);
        }
        Ok(())
    }
}

pub struct FakeParent {
    pmic: Arc<Mutex<FakePmic>>,
    has_regmap: bool,
    pub dummy_addr: Option<u8>
}

impl I2cParent for FakeParent {
    type Map = FakeMap;

    fn regmap(&mut self) -> Option<FakeMap> {
        self.has_regmap.then(|| FakeMap { pmic: self.pmic.clone(), space: Space::Parent })
    }

    fn new_dummy_device(&mut self, addr: u8) -> Result<FakeMap, KError> {
        self.dummy_addr = Some(addr);
        Ok(FakeMap { pmic: self.pmic.clone(), space: Space::Rtc })
    }

    fn irq(&self) -> u32 {
        PARENT_IRQ
    }
}

pub struct FakeDelay(Arc<Mutex<Vec<(u32, u32)>>>);

impl Delay for FakeDelay {
    fn usleep_range(&mut self, min_us: u32, max_us: u32) {
        self.0.lock().unwrap().push((min_us, max_us));
    }
}

impl Yield for FakeDelay {
    fn yield_cpu() {
        std::thread::yield_now();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrqEvent {
    AddChip(u32, &'static str, usize),
    DelChip(u32),
    Request(u32, &'static str),
    Free(u32),
    Enable(u32),
    Disable(u32),
    Wake(u32, bool)
}

pub struct FakeIrq {
    events: Arc<Mutex<Vec<IrqEvent>>>,
    has_virq: bool,
    fail_wake: bool
}

impl IrqController for FakeIrq {
    fn add_irq_chip(&mut self, irq: u32, flags: u32, chip: &'static IrqChip) -> Result<(), KError> {
        assert_eq!(flags, kernel_intf::IRQF_ONESHOT | kernel_intf::IRQF_SHARED);
        self.events.lock().unwrap().push(IrqEvent::AddChip(irq, chip.name, chip.sources().len()));
        Ok(())
    }

    fn del_irq_chip(&mut self, irq: u32) {
        self.events.lock().unwrap().push(IrqEvent::DelChip(irq));
    }

    fn get_virq(&self, _irq: u32, hwirq: usize) -> Option<u32> {
        self.has_virq.then(|| VIRQ_BASE + hwirq as u32)
    }

    fn request_irq(&mut self, virq: u32, name: &'static str) -> Result<(), KError> {
        self.events.lock().unwrap().push(IrqEvent::Request(virq, name));
        Ok(())
    }

    fn free_irq(&mut self, virq: u32) {
        self.events.lock().unwrap().push(IrqEvent::Free(virq));
    }

    fn enable_irq(&mut self, irq: u32) {
        self.events.lock().unwrap().push(IrqEvent::Enable(irq));
    }

    fn disable_irq(&mut self, irq: u32) {
        self.events.lock().unwrap().push(IrqEvent::Disable(irq));
    }

    fn set_irq_wake(&mut self, virq: u32, on: bool) -> Result<(), KError> {
        if self.fail_wake {
            return Err(KError::IoError);
        }
        self.events.lock().unwrap().push(IrqEvent::Wake(virq, on));
        Ok(())
    }
}

pub type TestRtc = Max77686Rtc<FakeMap, FakeDelay, FakeIrq>;

pub struct ProbeOpts {
    pub platform_irq: Option<u32>,
    pub has_regmap: bool,
    pub has_virq: bool,
    pub fail_wake: bool,
    pub fail: Option<(Space, u8)>,
    pub client: Option<&'static dyn AlarmClient>
}

impl Default for ProbeOpts {
    fn default() -> Self {
        Self {
            platform_irq: Some(PLATFORM_IRQ),
            has_regmap: true,
            has_virq: true,
            fail_wake: false,
            fail: None,
            client: None
        }
    }
}

pub struct Harness {
    pub pmic: Arc<Mutex<FakePmic>>,
    pub sleeps: Arc<Mutex<Vec<(u32, u32)>>>,
    pub irq_events: Arc<Mutex<Vec<IrqEvent>>>,
    pub dummy_addr: Option<u8>
}

impl Harness {
    pub fn pmic(&self) -> MutexGuard<'_, FakePmic> {
        self.pmic.lock().unwrap()
    }

    pub fn log(&self) -> Vec<Access> {
        self.pmic().log.clone()
    }

    pub fn sleeps(&self) -> Vec<(u32, u32)> {
        self.sleeps.lock().unwrap().clone()
    }

    pub fn irq_events(&self) -> Vec<IrqEvent> {
        self.irq_events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.pmic().log.clear();
        self.sleeps.lock().unwrap().clear();
        self.irq_events.lock().unwrap().clear();
    }
}

// Where the RTC block of a profile lives in the fake
pub fn rtc_space(profile: &VariantProfile) -> Space {
    if profile.rtc_i2c_addr.is_some() { Space::Rtc } else { Space::Parent }
}

pub fn reg(profile: &VariantProfile, offset: RegOffset) -> u8 {
    profile.reg(offset).unwrap()
}

pub fn probe_with(profile: &'static VariantProfile, opts: ProbeOpts) -> (Result<TestRtc, RtcError>, Harness) {
    let pmic = Arc::new(Mutex::new(FakePmic::new()));
    {
        let mut fake = pmic.lock().unwrap();
        fake.fail = opts.fail;
        fake.self_clearing = profile.reg(RegOffset::RtcUpdate0).map(|update| (rtc_space(profile), update));
    }

    let sleeps = Arc::new(Mutex::new(Vec::new()));
    let irq_events = Arc::new(Mutex::new(Vec::new()));

    let mut parent = FakeParent { pmic: pmic.clone(), has_regmap: opts.has_regmap, dummy_addr: None };

    let rtc = Max77686Rtc::probe_with_profile(profile, RtcResources {
        parent: &mut parent,
        platform_irq: opts.platform_irq,
        delay: FakeDelay(sleeps.clone()),
        irq_ctl: FakeIrq { events: irq_events.clone(), has_virq: opts.has_virq, fail_wake: opts.fail_wake },
        client: opts.client
    });

    let harness = Harness { pmic, sleeps, irq_events, dummy_addr: parent.dummy_addr };
    (rtc, harness)
}

// Probed instance with all bookkeeping from probe cleared
pub fn setup(model: ChipModel) -> (TestRtc, Harness) {
    setup_with(model.profile(), ProbeOpts::default())
}

pub fn setup_with(profile: &'static VariantProfile, opts: ProbeOpts) -> (TestRtc, Harness) {
    let (rtc, harness) = probe_with(profile, opts);
    let rtc = rtc.unwrap();
    harness.clear();
    (rtc, harness)
}

pub fn sample_time() -> kernel_intf::RtcTime {
    kernel_intf::RtcTime { sec: 0, min: 30, hour: 7, wday: Some(1), mday: 15, mon: Some(3), year: 125 }
}

pub const ALL_MODELS: [ChipModel; 4] = [
    ChipModel::Max77686,
    ChipModel::Max77802,
    ChipModel::Max77620,
    ChipModel::Max77714
];
