#![deny(unsafe_code)]
#![deny(warnings)]
//! Ethernet link bring-up
//!
//! W5500 hardware reset and embassy-net device creation, plus the DHCP
//! wait. This is pure plumbing for the network stack; the clock logic never
//! touches it beyond handing the stack to the SNTP client once.

use defmt::info;
use embassy_embedded_hal::shared_bus::asynch::spi::SpiDevice as SpiDeviceBus;
use embassy_net::Stack;
use embassy_net_wiznet::chip::W5500;
use embassy_net_wiznet::{Device, Runner};
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::Output;
use embassy_stm32::mode::Async;
use embassy_stm32::spi::Spi;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use static_cell::StaticCell;

/// Runner type returned by [`init_w5500`]; must be polled continuously.
pub type W5500Runner = Runner<
    'static,
    W5500,
    SpiDeviceBus<'static, CriticalSectionRawMutex, Spi<'static, Async>, Output<'static>>,
    ExtiInput<'static>,
    Output<'static>,
>;

/// Ethernet peripherals bundle
pub struct EthPeripherals {
    pub spi: Spi<'static, Async>,
    pub cs: Output<'static>,
    pub reset: Output<'static>,
    pub int: ExtiInput<'static>,
}

/// Initialize the W5500 Ethernet hardware.
///
/// Returns the embassy-net device and the runner that services the chip.
pub async fn init_w5500(periph: EthPeripherals, mac_addr: [u8; 6]) -> (Device<'static>, W5500Runner) {
    let EthPeripherals {
        spi,
        cs,
        mut reset,
        int,
    } = periph;

    info!("Performing W5500 hardware reset...");
    reset.set_low();
    embassy_time::Timer::after_millis(1).await;
    reset.set_high();
    embassy_time::Timer::after_millis(2).await;

    type SpiBusType = embassy_sync::mutex::Mutex<CriticalSectionRawMutex, Spi<'static, Async>>;
    static SPI_BUS: StaticCell<SpiBusType> = StaticCell::new();
    let spi_bus = SPI_BUS.init(embassy_sync::mutex::Mutex::new(spi));
    let spi_device = SpiDeviceBus::new(spi_bus, cs);

    static STATE: StaticCell<embassy_net_wiznet::State<4, 4>> = StaticCell::new();
    let state = STATE.init(embassy_net_wiznet::State::<4, 4>::new());

    let (device, runner) = embassy_net_wiznet::new(mac_addr, state, spi_device, int, reset)
        .await
        .unwrap();

    info!("W5500 initialized");

    (device, runner)
}

/// Wait for the DHCP lease and log the configuration.
pub async fn wait_for_config(stack: &Stack<'_>) {
    info!("Waiting for DHCP...");
    stack.wait_config_up().await;

    if let Some(config) = stack.config_v4() {
        let octets = config.address.address().octets();
        info!(
            "Link up, IP: {}.{}.{}.{}",
            octets[0], octets[1], octets[2], octets[3]
        );
    }
}
