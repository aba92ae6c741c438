//! Full example code for bringing up an SSD1306 module and printing two lines of text. This runs
//! on an STM32F303RE with a 0.96" 128x64 module on I2C1, PB6 for SCL and PB7 for SDA.

#![deny(unsafe_code)]
#![no_main]
#![no_std]

extern crate cortex_m;
extern crate stm32f30x;
extern crate stm32f30x_hal as hal;
#[macro_use]
extern crate cortex_m_rt;
extern crate panic_abort;
extern crate ssd1306_twi;

use cortex_m::asm;
use cortex_m_rt::ExceptionFrame;
use hal::i2c::I2c;
use hal::prelude::*;
use ssd1306_twi as oled;

entry!(main);

exception!(*, default_handler);
exception!(HardFault, hard_fault);

fn hard_fault(_ef: &ExceptionFrame) -> ! {
    asm::bkpt();
    loop {}
}

fn default_handler(_irqn: i16) {
    loop {}
}

fn main() -> ! {
    let dp = stm32f30x::Peripherals::take().unwrap();

    let mut flash = dp.FLASH.constrain();
    let mut rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze(&mut flash.acr);

    // I2C1 is Alternate Function 4 for GPIOs PB6,7.
    let mut gpiob = dp.GPIOB.split(&mut rcc.ahb);
    let scl = gpiob.pb6.into_af4(&mut gpiob.moder, &mut gpiob.afrl);
    let sda = gpiob.pb7.into_af4(&mut gpiob.moder, &mut gpiob.afrl);
    let i2c = I2c::i2c1(dp.I2C1, (scl, sda), 400.khz(), clocks, &mut rcc.apb1);

    let mut disp = oled::Display::new(oled::I2cInterface::new(i2c), oled::DisplaySize128x64);

    // Modules with the SA0 jumper moved answer at `consts::ALTERNATE_ADDRESS` instead.
    disp.init(&oled::Config::new().address(oled::consts::DEFAULT_ADDRESS))
        .unwrap();
    disp.clear().unwrap();

    disp.set_cursor(5, 0).unwrap();
    disp.draw_string(" 0.96\" OLED SSD1306", oled::TextStyle::NORMAL)
        .unwrap();
    disp.set_cursor(30, 1).unwrap();
    disp.draw_string("embedded Rust", oled::TextStyle::BOLD)
        .unwrap();
    disp.draw_horizontal_run(2, 0, 128, oled::rule::TOP_DOUBLE)
        .unwrap();

    loop {
        asm::wfi();
    }
}
