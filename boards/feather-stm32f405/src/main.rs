#![deny(unsafe_code)]
#![deny(warnings)]
#![no_main]
#![no_std]

//! Binary/analog network clock
//!
//! One SNTP exchange at startup sets the hardware RTC; from then on a
//! 1-second tick renders the RTC time onto a bank of binary-coded LEDs and
//! an SSD1306 text line, while a 500 ms heartbeat LED signals liveness.

use defmt_rtt as _; // global logger
use panic_probe as _;
use rtic::app;
use rtic_monotonics::stm32::prelude::*;

mod display;
mod leds;
mod net;
mod time;

stm32_tim2_monotonic!(Mono, 1_000_000);

#[app(device = embassy_stm32, peripherals = true, dispatchers = [USART1, USART2, USART3])]
mod app {
    use super::*;
    use defmt::{info, warn};
    use embassy_futures::join::join3;
    use embassy_futures::select::{select, Either};
    use embassy_net::{Config, StackResources};
    use embassy_stm32::exti::ExtiInput;
    use embassy_stm32::gpio::{Level, Output, Pull, Speed};
    use embassy_stm32::i2c::I2c;
    use embassy_stm32::rcc::{Hse, HseMode, LsConfig, LseConfig, LseMode};
    use embassy_stm32::rtc::{Rtc, RtcConfig};
    use embassy_stm32::spi::{self, Spi};
    use embassy_stm32::time::Hertz;
    use static_cell::StaticCell;

    use crate::display::ClockDisplay;
    use crate::leds::LedBank;
    use crate::net::EthPeripherals;

    /// Locally administered MAC for the W5500
    const MAC_ADDR: [u8; 6] = [0x02, 0x00, 0x00, 0xC1, 0x0C, 0x01];

    /// Upper bound on the DHCP wait. A missing cable or DHCP server must not
    /// keep the clock dark; past this the outputs start unsynchronized.
    const LINK_TIMEOUT_SECS: u64 = 30;

    #[shared]
    struct Shared {}

    #[local]
    struct Local {}

    #[init]
    fn init(_cx: init::Context) -> (Shared, Local) {
        info!("Binary clock starting...");

        // Adafruit Feather STM32F405: 12 MHz HSE, 32.768 kHz LSE (PC14/PC15)
        let mut config = embassy_stm32::Config::default();
        config.rcc.hse = Some(Hse {
            freq: Hertz(12_000_000),
            mode: HseMode::Oscillator,
        });

        // HSE (12 MHz) / PREDIV(6) = 2 MHz, * MUL(168) = 336 MHz VCO,
        // / DIVP(4) = 84 MHz SYSCLK
        config.rcc.pll_src = embassy_stm32::rcc::PllSource::HSE;
        config.rcc.pll = Some(embassy_stm32::rcc::Pll {
            prediv: embassy_stm32::rcc::PllPreDiv::DIV6,
            mul: embassy_stm32::rcc::PllMul::MUL168,
            divp: Some(embassy_stm32::rcc::PllPDiv::DIV4),
            divq: None,
            divr: None,
        });
        config.rcc.sys = embassy_stm32::rcc::Sysclk::PLL1_P;
        config.rcc.ahb_pre = embassy_stm32::rcc::AHBPrescaler::DIV1; // 84 MHz
        config.rcc.apb1_pre = embassy_stm32::rcc::APBPrescaler::DIV2; // 42 MHz
        config.rcc.apb2_pre = embassy_stm32::rcc::APBPrescaler::DIV1; // 84 MHz

        // LSE drives the RTC so it keeps time while unsynchronized
        config.rcc.ls = LsConfig {
            rtc: embassy_stm32::rcc::RtcClockSource::LSE,
            lsi: false,
            lse: Some(LseConfig {
                frequency: Hertz(32_768),
                mode: LseMode::Oscillator(embassy_stm32::rcc::LseDrive::MediumHigh),
            }),
        };

        let p = embassy_stm32::init(config);
        info!("System initialized with HSE (12MHz) and LSE (32.768kHz)");

        // TIM2 on APB1: timer clock = 2*APB1 when prescaler != 1
        Mono::start(84_000_000);

        let rtc = Rtc::new(p.RTC, RtcConfig::default());
        time::rtc::init(rtc);

        // LED bank, most-significant bit first in each array
        let bank = LedBank::new(
            [
                Output::new(p.PA0, Level::Low, Speed::Low),
                Output::new(p.PA1, Level::Low, Speed::Low),
                Output::new(p.PA2, Level::Low, Speed::Low),
                Output::new(p.PA3, Level::Low, Speed::Low),
            ],
            Output::new(p.PA4, Level::Low, Speed::Low),
            [
                Output::new(p.PA5, Level::Low, Speed::Low),
                Output::new(p.PA6, Level::Low, Speed::Low),
                Output::new(p.PA7, Level::Low, Speed::Low),
                Output::new(p.PB0, Level::Low, Speed::Low),
                Output::new(p.PB1, Level::Low, Speed::Low),
                Output::new(p.PB2, Level::Low, Speed::Low),
            ],
            [
                Output::new(p.PC4, Level::Low, Speed::Low),
                Output::new(p.PC5, Level::Low, Speed::Low),
                Output::new(p.PB8, Level::Low, Speed::Low),
                Output::new(p.PB9, Level::Low, Speed::Low),
                Output::new(p.PB10, Level::Low, Speed::Low),
                Output::new(p.PB12, Level::Low, Speed::Low),
            ],
        );

        let i2c = I2c::new_blocking(p.I2C1, p.PB6, p.PB7, Hertz::khz(400), Default::default());
        let display = ClockDisplay::new(i2c);

        let heartbeat_led = Output::new(p.PC1, Level::Low, Speed::Low);

        // W5500 Ethernet wing on SPI2
        let mut spi_config = spi::Config::default();
        spi_config.frequency = Hertz(10_000_000);
        let spi = Spi::new(
            p.SPI2,
            p.PB13,
            p.PB15,
            p.PB14,
            p.DMA1_CH4,
            p.DMA1_CH3,
            spi_config,
        );
        let eth_periph = EthPeripherals {
            spi,
            cs: Output::new(p.PC6, Level::High, Speed::VeryHigh),
            reset: Output::new(p.PC3, Level::High, Speed::Low),
            int: ExtiInput::new(p.PC2, p.EXTI2, Pull::Up),
        };

        network_task::spawn(eth_periph, bank, display, heartbeat_led).ok();

        (Shared {}, Local {})
    }

    /// Bootstrap: link bring-up, one-shot time sync, then the periodic
    /// output tasks. Sync runs strictly before any tick is installed so its
    /// bounded wait can never stall a callback.
    #[task(priority = 1)]
    async fn network_task(
        _cx: network_task::Context,
        periph: EthPeripherals,
        bank: LedBank,
        display: ClockDisplay,
        heartbeat_led: Output<'static>,
    ) {
        info!("Network task started");

        let (device, w5500_runner) = net::init_w5500(periph, MAC_ADDR).await;

        static RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();
        let (stack, mut net_runner) = embassy_net::new(
            device,
            Config::dhcpv4(Default::default()),
            RESOURCES.init(StackResources::new()),
            0x0b1a_c10c_u64,
        );
        info!("Network stack initialized with DHCP");

        let bootstrap = async {
            // The link wait is bounded: the clock must come up and show the
            // retained RTC time even with no cable or no DHCP server.
            let link = select(
                embassy_time::Timer::after_secs(LINK_TIMEOUT_SECS),
                net::wait_for_config(&stack),
            )
            .await;

            match link {
                Either::First(_) => warn!(
                    "No DHCP lease within {} s, starting unsynchronized",
                    LINK_TIMEOUT_SECS
                ),
                Either::Second(_) => {
                    match time::synchronize(&stack, time::NTP_SERVER, time::UTC_OFFSET_SECS).await
                    {
                        Ok(_) => info!("Startup time sync complete"),
                        Err(e) => warn!(
                            "Can't get time from network: {:?}, showing retained RTC time",
                            e
                        ),
                    }
                }
            }

            // Periodic outputs start on either outcome, after the one-shot
            // sync attempt
            render_tick::spawn(bank, display).ok();
            heartbeat::spawn(heartbeat_led).ok();
        };

        join3(w5500_runner.run(), net_runner.run(), bootstrap).await;
    }

    /// Render tick: once per second, read the clock and drive every output.
    /// Non-blocking by construction; no network I/O on this path.
    #[task(priority = 1)]
    async fn render_tick(_cx: render_tick::Context, mut bank: LedBank, mut display: ClockDisplay) {
        info!("Render task started");
        // Delay against an accumulated deadline so the render and flush time
        // does not drift the cadence.
        let mut next = Mono::now();
        loop {
            let now = time::rtc::now_or_epoch();
            let frame = binclock_core::render(&now);
            bank.drive(&frame);
            display.draw(&frame);
            next += 1000.millis();
            Mono::delay_until(next).await;
        }
    }

    /// Heartbeat: toggle the liveness LED twice per second.
    #[task(priority = 1)]
    async fn heartbeat(_cx: heartbeat::Context, mut led: Output<'static>) {
        info!("Heartbeat task started");
        loop {
            led.toggle();
            Mono::delay(500.millis()).await;
        }
    }

    /// RTIC idle task - WFI sleep mode when no tasks active
    #[idle]
    fn idle(_cx: idle::Context) -> ! {
        loop {
            cortex_m::asm::wfi();
        }
    }
}
